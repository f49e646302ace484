//! Batch processing with group-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which folds batches of
//! expense records concurrently while keeping every group's expenses in input
//! order.
//!
//! # Design
//!
//! A batch is partitioned by group. Each group's sub-batch is handed to its own
//! tokio task, which applies the expenses one after another to that group's
//! ledger. Different groups never share a ledger, so they can be folded in
//! parallel; batches themselves are processed one at a time by the caller.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncLedgerStore>  (per-group ledgers)
//!     └── SettlementEngine       (validation policy)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::error;

use super::AsyncLedgerStore;
use crate::core::engine::SettlementEngine;
use crate::core::ledger::LedgerOutcome;
use crate::types::{Expense, ExpenseRecord, GroupId, Settlement, ValidationError};

/// Result of applying a single expense
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Group the expense belongs to
    pub group: GroupId,

    /// Position of the expense within its group
    pub index: usize,

    /// The outcome (or validation failure) of applying it
    pub result: Result<LedgerOutcome, ValidationError>,
}

/// Batch processor with group-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared per-group ledgers
    store: Arc<AsyncLedgerStore>,

    /// Engine applying the validation policy
    engine: SettlementEngine,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `store` - Arc-wrapped ledger store shared with the caller
    /// * `engine` - Engine whose validation policy is applied to every expense
    pub fn new(store: Arc<AsyncLedgerStore>, engine: SettlementEngine) -> Self {
        Self { store, engine }
    }

    /// Partition a batch of expense records by group
    ///
    /// # Guarantees
    ///
    /// - Each expense appears in exactly one sub-batch
    /// - Expenses of each group keep their original order
    pub fn partition_by_group(&self, batch: Vec<ExpenseRecord>) -> HashMap<GroupId, Vec<Expense>> {
        let mut group_batches: HashMap<GroupId, Vec<Expense>> = HashMap::new();

        for record in batch {
            group_batches
                .entry(record.group)
                .or_default()
                .push(record.expense);
        }

        group_batches
    }

    /// Apply all expenses of one group sequentially
    ///
    /// The group's ledger stays locked while its sub-batch is applied.
    pub fn process_group_expenses(&self, group: &str, expenses: &[Expense]) -> Vec<ProcessingResult> {
        self.store.update(group, |ledger| {
            expenses
                .iter()
                .map(|expense| {
                    let index = ledger.expenses_seen();
                    let result = self.engine.apply_expense(group, ledger, expense);
                    ProcessingResult {
                        group: group.to_string(),
                        index,
                        result,
                    }
                })
                .collect()
        })
    }

    /// Process a batch of expense records with group-based partitioning
    ///
    /// 1. Partitions the batch by group
    /// 2. Spawns one tokio task per group
    /// 3. Waits for all tasks and collects their results
    ///
    /// Results of different groups may come back in any order.
    pub async fn process_batch(&self, batch: Vec<ExpenseRecord>) -> Vec<ProcessingResult> {
        let group_batches = self.partition_by_group(batch);

        let mut tasks = Vec::with_capacity(group_batches.len());
        for (group, expenses) in group_batches {
            let processor = self.clone();
            let task = tokio::spawn(async move {
                processor.process_group_expenses(&group, &expenses)
            });
            tasks.push(task);
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!("Group task panicked: {:?}", e),
            }
        }

        results
    }

    /// Plan every group concurrently
    ///
    /// Call once all batches have been processed.
    ///
    /// # Returns
    ///
    /// One settlement per group, ordered by group id.
    pub async fn settle_all(&self) -> BTreeMap<GroupId, Settlement> {
        let mut tasks = Vec::with_capacity(self.store.len());
        for (group, ledger) in self.store.snapshot() {
            tasks.push(tokio::spawn(async move {
                (group, SettlementEngine::finish(ledger))
            }));
        }

        let mut settlements = BTreeMap::new();
        for task in tasks {
            match task.await {
                Ok((group, settlement)) => {
                    settlements.insert(group, settlement);
                }
                Err(e) => error!("Planning task panicked: {:?}", e),
            }
        }

        settlements
    }
}

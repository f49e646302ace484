//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates settlement by coordinating
//! between the SyncReader (for CSV input) and the SettlementEngine (for the
//! validation policy and planning).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Balance folding to one `BalanceLedger` per group
//! - Planning to `SettlementEngine::finish`
//! - CSV output to `csv_format::write_report`
//!
//! # Memory Efficiency
//!
//! Expenses are streamed one row at a time; memory usage is
//! O(participants + groups), not O(expenses).

use crate::cli::ReportKind;
use crate::core::{BalanceLedger, EngineConfig, GroupDirectory, SettlementEngine};
use crate::io::csv_format::{collect_directory, write_report, ExpenseCsvRecord, ParticipantCsvRecord};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, SettlementInput};
use crate::types::{GroupId, Settlement, SettlementError};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use settle_up::cli::ReportKind;
/// use settle_up::core::EngineConfig;
/// use settle_up::strategy::{ProcessingStrategy, SettlementInput, SyncProcessingStrategy};
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(EngineConfig::default(), ReportKind::Transfers);
/// let input = SettlementInput::new("participants.csv", "expenses.csv");
///
/// strategy.process(&input, &mut io::stdout()).expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    engine: SettlementEngine,
    report: ReportKind,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy
    pub fn new(config: EngineConfig, report: ReportKind) -> Self {
        Self {
            engine: SettlementEngine::new(config),
            report,
        }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process the input files and write the report to output
    ///
    /// 1. Reads the participant directory
    /// 2. Creates one ledger per group of the directory
    /// 3. Streams expenses, applying each to its group's ledger
    /// 4. Plans every group and writes the report
    fn process(&self, input: &SettlementInput, output: &mut dyn Write) -> Result<(), SettlementError> {
        let directory: GroupDirectory =
            collect_directory(SyncReader::<ParticipantCsvRecord>::new(&input.participants)?);
        debug!(groups = directory.len(), "Participant directory loaded");

        let mut ledgers: BTreeMap<GroupId, BalanceLedger> = directory
            .iter()
            .map(|(group, members)| (group.clone(), BalanceLedger::new(members)))
            .collect();

        for result in SyncReader::<ExpenseCsvRecord>::new(&input.expenses)? {
            match result {
                Ok(record) => {
                    let ledger = ledgers.entry(record.group.clone()).or_default();
                    if let Err(error) = self.engine.apply_expense(&record.group, ledger, &record.expense) {
                        debug!(reason = error.reason_code(), "Expense not applied");
                    }
                }
                Err(e) => warn!("Row skipped: {}", e),
            }
        }

        let settlements: BTreeMap<GroupId, Settlement> = ledgers
            .into_iter()
            .map(|(group, ledger)| (group, SettlementEngine::finish(ledger)))
            .collect();

        write_report(self.report, &settlements, &directory, output)
    }
}

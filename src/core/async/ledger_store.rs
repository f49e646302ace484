//! Thread-safe ledger storage for async batch processing
//!
//! This module provides the `AsyncLedgerStore` struct, which keeps one
//! [`BalanceLedger`] per group in a `DashMap` so different groups can be folded
//! on different threads at the same time.
//!
//! # Thread Safety
//!
//! Operations on different groups proceed in parallel. Operations on the same
//! group are serialized by the map's per-entry lock, and the batch processor
//! never runs two tasks for the same group concurrently, so each group's
//! expenses are applied in input order.

use crate::core::directory::GroupDirectory;
use crate::core::ledger::BalanceLedger;
use crate::core::traits::ParticipantSource;
use crate::types::GroupId;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Thread-safe per-group ledger store
#[derive(Debug, Default)]
pub struct AsyncLedgerStore {
    /// Ledger per group
    ledgers: DashMap<GroupId, BalanceLedger>,
}

impl AsyncLedgerStore {
    /// Create an empty store
    ///
    /// Ledgers are created on demand, with no participants, for groups that
    /// appear only in the expense input.
    pub fn new() -> Self {
        Self {
            ledgers: DashMap::new(),
        }
    }

    /// Create a store with one ledger per group of the directory
    pub fn from_directory(directory: &GroupDirectory) -> Self {
        let ledgers = DashMap::new();
        for group in directory.groups() {
            let ledger = BalanceLedger::new(directory.members(&group));
            ledgers.insert(group, ledger);
        }
        Self { ledgers }
    }

    /// Run a closure against a group's ledger
    ///
    /// The ledger entry is locked for the duration of the closure. If the
    /// group has no ledger yet, an empty one is created first.
    pub fn update<F, T>(&self, group: &str, f: F) -> T
    where
        F: FnOnce(&mut BalanceLedger) -> T,
    {
        let mut entry = self
            .ledgers
            .entry(group.to_string())
            .or_insert_with(BalanceLedger::default);
        f(entry.value_mut())
    }

    /// Number of groups in the store
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// Whether the store holds no groups
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Copy of every ledger, ordered by group id
    ///
    /// The result is a snapshot; later updates are not reflected in it.
    pub fn snapshot(&self) -> BTreeMap<GroupId, BalanceLedger> {
        self.ledgers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

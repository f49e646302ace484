//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent counterparts of the ledger
//! fold used by the async processing strategy.
//!
//! # Architecture
//!
//! - **AsyncLedgerStore**: One balance ledger per group in a DashMap
//! - **BatchProcessor**: Partitions batches by group and folds groups in parallel
//!
//! # Thread Safety
//!
//! - Different groups are folded in parallel
//! - Expenses of the same group are applied sequentially, in input order
//! - No global locks - fine-grained locking per group

pub mod batch_processor;
pub mod ledger_store;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use ledger_store::AsyncLedgerStore;

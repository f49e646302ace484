//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It folds expenses in batches using thread-based
//! parallelism with group-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (group partitioning + tokio tasks)
//!         ├── AsyncLedgerStore (DashMap of per-group ledgers)
//!         └── SettlementEngine (validation policy)
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another, and within a batch each group is
//! folded by a single task, so every group sees its expenses in input order.
//! The report is therefore identical to the one of the sync strategy.

use crate::cli::ReportKind;
use crate::core::r#async::{AsyncLedgerStore, BatchProcessor};
use crate::core::{EngineConfig, SettlementEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{collect_directory, write_report, ExpenseCsvRecord, ParticipantCsvRecord};
use crate::strategy::{ProcessingStrategy, SettlementInput};
use crate::types::SettlementError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, warn};

/// Configuration for batch processing
///
/// Controls how expenses are batched and the number of worker threads for
/// parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of expense rows per batch
    pub batch_size: usize,
    /// Number of worker threads folding groups concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Expenses are read in batches and processed batch by batch. Within each
/// batch, expenses are partitioned by group and the groups are folded in
/// parallel across the runtime's worker threads.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
    engine: SettlementEngine,
    report: ReportKind,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    pub fn new(config: BatchConfig, engine: EngineConfig, report: ReportKind) -> Self {
        Self {
            config,
            engine: SettlementEngine::new(engine),
            report,
        }
    }

    async fn open(path: &Path) -> Result<Compat<tokio::fs::File>, SettlementError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| SettlementError::open_error(path, e))?;

        // Wrap tokio file in a compatibility layer for csv-async
        Ok(file.compat())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process the input files and write the report to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads the participant directory and seeds one ledger per group
    /// 3. Reads expenses in batches, waiting for each batch to finish
    /// 4. Plans all groups concurrently and writes the report
    fn process(&self, input: &SettlementInput, output: &mut dyn Write) -> Result<(), SettlementError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| SettlementError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let participants = Self::open(&input.participants).await?;
            let rows = AsyncReader::<_, ParticipantCsvRecord>::new(participants)
                .read_all(self.config.batch_size)
                .await;
            let directory = collect_directory(rows.into_iter().map(Ok));
            debug!(groups = directory.len(), "Participant directory loaded");

            let store = Arc::new(AsyncLedgerStore::from_directory(&directory));
            let processor = BatchProcessor::new(Arc::clone(&store), self.engine);

            let expenses = Self::open(&input.expenses).await?;
            let mut reader = AsyncReader::<_, ExpenseCsvRecord>::new(expenses);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the batch before reading the next one so that a
                // group spanning several batches keeps its order
                let results = processor.process_batch(batch).await;
                debug!(expenses = results.len(), "Batch processed");
            }

            let settlements = processor.settle_all().await;
            write_report(self.report, &settlements, &directory, output)
        })
    }
}

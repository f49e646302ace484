//! Processing strategy module for settlement pipelines
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! encompassing CSV parsing, balance folding, planning and report output. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime. Every strategy produces the same report
//! for the same input.

use crate::cli::{ReportKind, StrategyType};
use crate::core::EngineConfig;
use crate::types::SettlementError;
use std::io::Write;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Input files of one settlement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementInput {
    /// CSV with `group,id,name` rows
    pub participants: PathBuf,

    /// CSV with `group,amount,paid_by,split_between[,description]` rows
    pub expenses: PathBuf,
}

impl SettlementInput {
    /// Create a new SettlementInput
    pub fn new(participants: impl Into<PathBuf>, expenses: impl Into<PathBuf>) -> Self {
        Self {
            participants: participants.into(),
            expenses: expenses.into(),
        }
    }
}

/// Processing strategy trait for complete settlement pipelines
///
/// Each strategy reads the participant directory and the expense stream,
/// folds every group's expenses under the engine's validation policy, plans
/// the transfers and writes the selected report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process the input files and write the report to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be opened (file not found, permission denied)
    /// - The async runtime cannot be started
    /// - Output cannot be written
    ///
    /// Malformed rows and rejected expenses are logged and skipped; they do
    /// not cause this method to return an error.
    fn process(&self, input: &SettlementInput, output: &mut dyn Write) -> Result<(), SettlementError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `engine` - Validation policy applied to every expense
/// * `report` - Report written once all groups are settled
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    engine: EngineConfig,
    report: ReportKind,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine, report)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, engine, report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir) -> SettlementInput {
        let participants = dir.path().join("participants.csv");
        let expenses = dir.path().join("expenses.csv");
        fs::write(&participants, "group,id,name\ntrip,u1,Max\ntrip,u2,Erika\n").unwrap();
        fs::write(
            &expenses,
            "group,amount,paid_by,split_between\ntrip,20,u1,u1;u2\n",
        )
        .unwrap();
        SettlementInput::new(participants, expenses)
    }

    #[test]
    fn test_create_strategy_produces_same_report() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);

        let mut outputs = Vec::new();
        for strategy_type in [StrategyType::Sync, StrategyType::Async] {
            let strategy = create_strategy(
                strategy_type,
                EngineConfig::default(),
                ReportKind::Transfers,
                Some(BatchConfig::new(1, 2)),
            );
            let mut output = Vec::new();
            strategy.process(&input, &mut output).unwrap();
            outputs.push(String::from_utf8(output).unwrap());
        }

        assert_eq!(
            outputs[0],
            "group,from,from_name,to,to_name,amount\ntrip,u2,Erika,u1,Max,10.00\n"
        );
        assert_eq!(outputs[0], outputs[1]);
    }
}

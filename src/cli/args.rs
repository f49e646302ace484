use crate::core::{EngineConfig, ValidationMode};
use crate::strategy::{BatchConfig, SettlementInput};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Settle shared expenses into a minimal list of transfers
#[derive(Parser, Debug)]
#[command(name = "settle-up")]
#[command(about = "Settle shared expenses into a minimal list of transfers", long_about = None)]
pub struct CliArgs {
    /// CSV file with the participants of every group
    #[arg(value_name = "PARTICIPANTS", help = "Path to the participants CSV file (group,id,name)")]
    pub participants_file: PathBuf,

    /// CSV file with the expenses of every group
    #[arg(
        value_name = "EXPENSES",
        help = "Path to the expenses CSV file (group,amount,paid_by,split_between[,description])"
    )]
    pub expenses_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of expense rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of expense rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads folding groups concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Report written to stdout
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "transfers",
        help = "Report to write: transfers, balances or summary"
    )]
    pub report: ReportKind,

    /// Apply degraded expenses instead of rejecting them
    #[arg(
        long = "lenient",
        help = "Skip unattributable expenses and ignore unknown payers instead of rejecting them"
    )]
    pub lenient: bool,

    /// Diagnostics format on stderr
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        default_value = "text",
        help = "Log format on stderr: text or json (level via RUST_LOG, default: warn)"
    )]
    pub log_format: LogFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// `group,from,from_name,to,to_name,amount`
    Transfers,
    /// `group,participant,name,balance`
    Balances,
    /// `group,participants,expenses,skipped,total_spent,transfers`
    Summary,
}

/// Log output formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// `BatchConfig::new`, which logs a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Engine configuration selected by `--lenient`
    pub fn to_engine_config(&self) -> EngineConfig {
        let mode = if self.lenient {
            ValidationMode::Lenient
        } else {
            ValidationMode::Strict
        };
        EngineConfig::new(mode)
    }

    /// Input files of the run
    pub fn to_input(&self) -> SettlementInput {
        SettlementInput::new(&self.participants_file, &self.expenses_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[test]
    fn test_positional_files() {
        let parsed = CliArgs::try_parse_from(["program", "people.csv", "costs.csv"]).unwrap();
        let input = parsed.to_input();

        assert_eq!(input.participants, Path::new("people.csv"));
        assert_eq!(input.expenses, Path::new("costs.csv"));
    }

    #[rstest]
    #[case::default_strategy(&["program", "p.csv", "e.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "p.csv", "e.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "p.csv", "e.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_report(&["program", "p.csv", "e.csv"], ReportKind::Transfers)]
    #[case::balances(&["program", "--report", "balances", "p.csv", "e.csv"], ReportKind::Balances)]
    #[case::summary(&["program", "--report", "summary", "p.csv", "e.csv"], ReportKind::Summary)]
    fn test_report_parsing(#[case] args: &[&str], #[case] expected: ReportKind) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report, expected);
    }

    #[rstest]
    #[case::default_text(&["program", "p.csv", "e.csv"], LogFormat::Text)]
    #[case::json(&["program", "--log-format", "json", "p.csv", "e.csv"], LogFormat::Json)]
    fn test_log_format_parsing(#[case] args: &[&str], #[case] expected: LogFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.log_format, expected);
    }

    #[rstest]
    #[case::strict_by_default(&["program", "p.csv", "e.csv"], ValidationMode::Strict)]
    #[case::lenient(&["program", "--lenient", "p.csv", "e.csv"], ValidationMode::Lenient)]
    fn test_engine_config(#[case] args: &[&str], #[case] expected: ValidationMode) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.to_engine_config().validation, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "p.csv", "e.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "p.csv", "e.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[rstest]
    #[case::missing_inputs(&["program"])]
    #[case::missing_expenses(&["program", "p.csv"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "p.csv", "e.csv"])]
    #[case::invalid_report(&["program", "--report", "ledger", "p.csv", "e.csv"])]
    #[case::invalid_log_format(&["program", "--log-format", "xml", "p.csv", "e.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}

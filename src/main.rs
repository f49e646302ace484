//! Settle-Up CLI
//!
//! Command-line interface for settling shared expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- participants.csv expenses.csv > transfers.csv
//! cargo run -- --strategy sync participants.csv expenses.csv > transfers.csv
//! cargo run -- --report balances --lenient participants.csv expenses.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 participants.csv expenses.csv
//! ```
//!
//! The program reads the participant directory and the expense rows, settles
//! every group with the selected processing strategy, and writes the selected
//! report to stdout. Diagnostics go to stderr (`RUST_LOG`, default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use settle_up::cli;
use settle_up::logging;
use settle_up::strategy;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_format);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.to_engine_config(), args.report, config)
    };

    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&args.to_input(), &mut output) {
        error!("Settlement failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

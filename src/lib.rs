//! Settle-Up Library
//! # Overview
//!
//! This library settles shared expenses within a group: it folds every
//! expense into one signed net balance per participant and turns those
//! balances into a short list of transfers that brings everyone back to zero.
//! A streaming CSV front end runs the same computation for many groups with
//! either a sync or an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Participant, Expense, Transfer, Settlement, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Folds expenses into net balances
//!   - [`core::planner`] - Greedy transfer planning with a 0.01 tolerance
//!   - [`core::validation`] - Caller-contract checks with stable reason codes
//!   - [`core::engine`] - Validation policy and orchestration
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Pluggable sync/async processing pipelines
//! - [`logging`] - tracing subscriber setup
//!
//! # Balances
//!
//! A positive balance means the participant is owed money; a negative
//! balance means they owe money. For every applied expense the payer is
//! credited the full amount and each known member of the split set is debited
//! an equal share, so balances always sum to zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use settle_up::{Expense, Participant, SettlementEngine, Transfer};
//!
//! let participants = vec![Participant::new("u1", "Max"), Participant::new("u2", "Erika")];
//! let expenses = vec![Expense::new(Decimal::from(20), "u1", ["u1", "u2"])];
//!
//! let settlement = SettlementEngine::default().settle(&participants, &expenses).unwrap();
//! assert_eq!(settlement.transfers, vec![Transfer::new("u2", "u1", Decimal::from(10))]);
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    apply_transfers, is_involved, is_settled, BalanceLedger, EngineConfig, GroupDirectory,
    LedgerOutcome, SettlementEngine, SettlementPlanner, ValidationMode, EPSILON,
};
pub use io::write_report;
pub use types::{
    Balances, Expense, ExpenseRecord, GroupId, LedgerSummary, Participant, ParticipantId,
    Settlement, SettlementError, Transfer, ValidationError,
};

//! Core business logic module
//!
//! This module contains the settlement components:
//! - `ledger` - Folds expenses into per-participant balances
//! - `planner` - Greedy settlement planning and the settlement tolerance
//! - `validation` - Caller-contract checks with typed reasons
//! - `engine` - Ties validation, ledger and planner together
//! - `directory` - In-memory participant directory per group
//! - `traits` - Interfaces of the external participant and expense sources
//! - `async` - Concurrent per-group folding for the async strategy

pub mod r#async;
pub mod directory;
pub mod engine;
pub mod ledger;
pub mod planner;
pub mod traits;
pub mod validation;

pub use directory::GroupDirectory;
pub use engine::{EngineConfig, SettlementEngine, ValidationMode};
pub use ledger::{is_involved, BalanceLedger, LedgerOutcome};
pub use planner::{apply_transfers, is_settled, SettlementPlanner, EPSILON};
pub use r#async::{AsyncLedgerStore, BatchProcessor};
pub use traits::{ExpenseSource, ParticipantSource};
pub use validation::{validate, validate_expense};

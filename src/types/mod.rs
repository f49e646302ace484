//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `participant`: Participant and group identifiers
//! - `expense`: Expense records
//! - `settlement`: Balances, transfers and settlement results
//! - `error`: Error types for the settlement engine

pub mod error;
pub mod expense;
pub mod participant;
pub mod settlement;

pub use error::{SettlementError, ValidationError};
pub use expense::{Expense, ExpenseRecord};
pub use participant::{GroupId, Participant, ParticipantId};
pub use settlement::{Balances, LedgerSummary, Settlement, Transfer};

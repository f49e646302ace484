//! Error types for the settlement engine
//!
//! This module defines all error types that can occur while loading group data
//! and settling balances. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed rows, invalid amounts, etc.
//! - **Validation Errors**: Caller-contract violations detected before computation
//! - **Runtime Errors**: The async runtime could not be started

use thiserror::Error;

/// Reason an input set was rejected before computation
///
/// Each variant carries a stable machine-readable code via
/// [`ValidationError::reason_code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The group has no participants at all
    #[error("Group has no participants")]
    EmptyParticipants,

    /// The same participant id appears more than once
    #[error("Duplicate participant id '{id}'")]
    DuplicateParticipant {
        /// The repeated id
        id: String,
    },

    /// Expense amount is zero or negative
    #[error("Expense #{index} has non-positive amount {amount}")]
    NonPositiveAmount {
        /// Position of the expense in the input
        index: usize,
        /// The offending amount
        amount: String,
    },

    /// The payer is not a participant of the group
    ///
    /// Applying such an expense would debit the split set without crediting
    /// anyone and break conservation.
    #[error("Expense #{index} is paid by unknown participant '{paid_by}'")]
    UnknownPayer {
        /// Position of the expense in the input
        index: usize,
        /// The unknown payer id
        paid_by: String,
    },

    /// No id in the split set is a participant of the group
    #[error("Expense #{index} has no known participant to split between")]
    EmptySplit {
        /// Position of the expense in the input
        index: usize,
    },

    /// Applying the expense would overflow a balance or the spent total
    #[error("Expense #{index} overflows the representable amount range")]
    AmountOverflow {
        /// Position of the expense in the input
        index: usize,
    },
}

impl ValidationError {
    /// Stable reason code for logs and machine consumers
    pub fn reason_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyParticipants => "empty_participants",
            ValidationError::DuplicateParticipant { .. } => "duplicate_participant",
            ValidationError::NonPositiveAmount { .. } => "non_positive_amount",
            ValidationError::UnknownPayer { .. } => "unknown_payer",
            ValidationError::EmptySplit { .. } => "empty_split",
            ValidationError::AmountOverflow { .. } => "amount_overflow",
        }
    }
}

/// Main error type for the settlement engine
///
/// This enum represents all fatal or per-record errors that can occur while
/// reading group data and computing settlements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and processing continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Invalid amount value in an expense row
    #[error("Invalid amount '{amount}' in group '{group}'")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// Group the row belongs to
        group: String,
    },

    /// Input rejected by validation
    #[error("Validation failed ({code}): {0}", code = .0.reason_code())]
    Validation(#[from] ValidationError),

    /// The async runtime could not be created
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime failure
        message: String,
    },
}

impl From<std::io::Error> for SettlementError {
    fn from(error: std::io::Error) -> Self {
        SettlementError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for SettlementError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl SettlementError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        SettlementError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a ParseError with an optional line number
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        SettlementError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Attach an input line number to a per-row error
    ///
    /// Row errors are reported as [`SettlementError::ParseError`]; an existing
    /// line number is kept.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            SettlementError::ParseError { line: Some(_), .. } => self,
            SettlementError::ParseError { line: None, message } => SettlementError::ParseError {
                line: Some(line),
                message,
            },
            other => SettlementError::ParseError {
                line: Some(line),
                message: other.to_string(),
            },
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, group: &str) -> Self {
        SettlementError::InvalidAmount {
            amount: amount.to_string(),
            group: group.to_string(),
        }
    }

    /// Create a RuntimeError
    pub fn runtime(message: impl Into<String>) -> Self {
        SettlementError::RuntimeError {
            message: message.into(),
        }
    }

    /// Open a file, mapping a missing file to [`SettlementError::FileNotFound`]
    pub fn open_error(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::file_not_found(path)
        } else {
            SettlementError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            }
        }
    }
}

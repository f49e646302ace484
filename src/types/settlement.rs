//! Settlement-related types
//!
//! Balances and transfers are derived on demand from the current expense list
//! and are never stored as first-class records.

use super::participant::ParticipantId;
use crate::core::planner;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Net position per participant
///
/// Positive means the participant is owed money, negative means they owe
/// money. Keyed by id so iteration order is stable.
pub type Balances = BTreeMap<ParticipantId, Decimal>;

/// A single payment in a settlement plan
///
/// `from` must pay `amount` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// The paying participant (a debtor)
    pub from: ParticipantId,

    /// The receiving participant (a creditor)
    pub to: ParticipantId,

    /// Amount to pay, always greater than the settlement tolerance
    pub amount: Decimal,
}

impl Transfer {
    /// Create a new transfer
    pub fn new(from: impl Into<ParticipantId>, to: impl Into<ParticipantId>, amount: Decimal) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Bookkeeping counters collected while folding a group's expenses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSummary {
    /// Number of distinct participants in the ledger
    pub participants: usize,

    /// Expenses that changed at least one balance
    pub applied_expenses: usize,

    /// Expenses that were skipped or rejected
    pub skipped_expenses: usize,

    /// Sum of the amounts of all applied expenses
    pub total_spent: Decimal,
}

/// Result of settling one group
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Net position of every participant
    pub balances: Balances,

    /// Ordered transfer plan that zeroes all balances
    pub transfers: Vec<Transfer>,

    /// Counters gathered while folding the expenses
    pub summary: LedgerSummary,
}

impl Settlement {
    /// Whether nobody owes anybody anything
    ///
    /// Every balance must lie within [`EPSILON`](crate::core::EPSILON) of zero.
    /// An empty transfer plan alone is not enough: in lenient mode the
    /// balances may hold only debtors.
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(|value| planner::is_settled(*value))
    }
}

//! Expense-related types for the settlement engine
//!
//! This module defines the expense record folded by the balance ledger and the
//! group-tagged record produced by the CSV readers.

use super::participant::{GroupId, ParticipantId};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// A single shared expense
///
/// One participant paid `amount`, and the cost is divided equally among the
/// participants in `split_between`. The engine never mutates an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Amount paid (expected to be > 0)
    pub amount: Decimal,

    /// The participant who paid the full amount
    pub paid_by: ParticipantId,

    /// The split set: participants among whom the amount is divided
    ///
    /// Ids that are not members of the group are tolerated here and filtered
    /// out by the ledger.
    pub split_between: BTreeSet<ParticipantId>,

    /// Free-text description (reports and diagnostics only)
    pub description: Option<String>,
}

impl Expense {
    /// Create a new expense without a description
    pub fn new<I, S>(amount: Decimal, paid_by: impl Into<ParticipantId>, split_between: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ParticipantId>,
    {
        Expense {
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Attach a description to the expense
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the participant paid for or shares in this expense
    pub fn involves(&self, participant: &str) -> bool {
        self.paid_by == participant || self.split_between.contains(participant)
    }
}

/// Expense record tagged with the group it belongs to
///
/// Produced by the CSV readers; the strategies route each record to the
/// ledger of its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// The group this expense was recorded in
    pub group: GroupId,

    /// The expense itself
    pub expense: Expense,
}

//! Input validation
//!
//! Checks the caller contract before any balance is computed, so a bad input
//! surfaces as a typed [`ValidationError`] instead of a silently wrong or
//! non-zero-sum result.

use crate::types::{Expense, Participant, ValidationError};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Validate a group's participants and expenses
///
/// Checks, in order:
/// 1. The participant list is not empty
/// 2. No participant id appears twice
/// 3. Every expense (in input order) passes [`validate_expense`]
///
/// Unknown ids inside a split set are allowed as long as at least one known
/// id remains; the ledger filters them.
pub fn validate(participants: &[Participant], expenses: &[Expense]) -> Result<(), ValidationError> {
    if participants.is_empty() {
        return Err(ValidationError::EmptyParticipants);
    }

    let mut known: BTreeSet<&str> = BTreeSet::new();
    for participant in participants {
        if !known.insert(participant.id.as_str()) {
            return Err(ValidationError::DuplicateParticipant {
                id: participant.id.clone(),
            });
        }
    }

    for (index, expense) in expenses.iter().enumerate() {
        validate_expense(index, expense, |id| known.contains(id))?;
    }

    Ok(())
}

/// Validate a single expense against a membership predicate
///
/// # Arguments
///
/// * `index` - Position of the expense in its group, used in error messages
/// * `expense` - The expense to check
/// * `is_known` - Returns true for ids that belong to the group
pub fn validate_expense<F>(index: usize, expense: &Expense, is_known: F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    if expense.amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount {
            index,
            amount: expense.amount.to_string(),
        });
    }

    if !is_known(&expense.paid_by) {
        return Err(ValidationError::UnknownPayer {
            index,
            paid_by: expense.paid_by.clone(),
        });
    }

    if !expense.split_between.iter().any(|id| is_known(id)) {
        return Err(ValidationError::EmptySplit { index });
    }

    Ok(())
}

//! Balance ledger module
//!
//! This module provides the `BalanceLedger` which folds a group's expenses into
//! one signed balance per participant.
//!
//! The ledger is responsible for:
//! - Starting every known participant at zero
//! - Crediting the payer with the full amount of each expense
//! - Debiting every known member of the split set with an equal share
//! - Counting applied and skipped expenses for reporting
//!
//! The balance map is owned by the ledger and only ever leaves it by value
//! through [`BalanceLedger::into_balances`].

use crate::core::validation::validate_expense;
use crate::types::{Balances, Expense, LedgerSummary, Participant, ParticipantId, ValidationError};
use rust_decimal::Decimal;
use tracing::{trace, warn};

/// Effect a single expense had on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// Payer credited and split set debited
    Applied,

    /// Payer is not a participant: only the debit side was applied
    ///
    /// The balances no longer sum to zero after this outcome.
    AppliedWithoutPayer,

    /// No id in the split set is a participant: nothing was applied
    Skipped,
}

/// Per-group balance accumulator
///
/// Expenses are applied in input order. For identical participant and
/// expense lists the resulting balances are identical, independent of how
/// the inputs were built.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    /// Net position per known participant
    balances: Balances,

    /// Expenses seen so far (applied, skipped or rejected)
    seen: usize,

    applied: usize,
    skipped: usize,
    total_spent: Decimal,
}

impl BalanceLedger {
    /// Create a ledger with one zero balance per distinct participant id
    pub fn new(participants: &[Participant]) -> Self {
        let balances = participants
            .iter()
            .map(|participant| (participant.id.clone(), Decimal::ZERO))
            .collect();

        BalanceLedger {
            balances,
            ..Default::default()
        }
    }

    /// Fold a full expense list into balances
    ///
    /// Unknown split ids are filtered, expenses without any known split id are
    /// skipped and an unknown payer is not credited. Expenses that would
    /// overflow a balance are skipped. Never fails.
    pub fn compute(participants: &[Participant], expenses: &[Expense]) -> Balances {
        let mut ledger = Self::new(participants);
        for expense in expenses {
            if let Err(error) = ledger.apply(expense) {
                warn!(reason = error.reason_code(), "Expense not applied: {}", error);
            }
        }
        ledger.into_balances()
    }

    /// Whether the id belongs to a participant of this ledger
    pub fn is_known(&self, id: &str) -> bool {
        self.balances.contains_key(id)
    }

    /// Number of expenses seen so far, which is also the index of the next one
    pub fn expenses_seen(&self) -> usize {
        self.seen
    }

    /// Apply one expense with the lenient policy
    ///
    /// All new values are computed before any of them is stored, so an
    /// expense is either applied in full or not at all.
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerOutcome)` describing which sides of the expense were applied
    /// * `Err(ValidationError::AmountOverflow)` if a balance or the spent total
    ///   would leave the `Decimal` range
    pub fn apply(&mut self, expense: &Expense) -> Result<LedgerOutcome, ValidationError> {
        let index = self.seen;
        self.seen += 1;

        let valid_split = self.valid_split(expense);
        if valid_split.is_empty() {
            self.skipped += 1;
            return Ok(LedgerOutcome::Skipped);
        }

        let share = expense.amount / Decimal::from(valid_split.len());

        let Some((updates, total_spent)) = self.stage(expense, &valid_split, share) else {
            self.skipped += 1;
            return Err(ValidationError::AmountOverflow { index });
        };

        let outcome = if self.is_known(&expense.paid_by) {
            LedgerOutcome::Applied
        } else {
            LedgerOutcome::AppliedWithoutPayer
        };

        self.balances.extend(updates);
        self.applied += 1;
        self.total_spent = total_spent;

        trace!(
            paid_by = %expense.paid_by,
            amount = %expense.amount,
            %share,
            ?outcome,
            "Applied expense"
        );

        Ok(outcome)
    }

    /// Apply one expense after validating it
    ///
    /// The expense is either applied in full or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ledger has no participants
    /// - The amount is zero or negative
    /// - The payer is not a participant
    /// - No id in the split set is a participant
    /// - A balance or the spent total would overflow
    pub fn apply_checked(&mut self, expense: &Expense) -> Result<LedgerOutcome, ValidationError> {
        let index = self.seen;

        let checked = if self.balances.is_empty() {
            Err(ValidationError::EmptyParticipants)
        } else {
            validate_expense(index, expense, |id| self.is_known(id))
        };

        if let Err(error) = checked {
            self.seen += 1;
            self.skipped += 1;
            return Err(error);
        }

        self.apply(expense)
    }

    /// Current balances (snapshot by reference)
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Counters gathered so far
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            participants: self.balances.len(),
            applied_expenses: self.applied,
            skipped_expenses: self.skipped,
            total_spent: self.total_spent,
        }
    }

    /// Consume the ledger and return the final balances
    pub fn into_balances(self) -> Balances {
        self.balances
    }

    /// New balances of the touched participants and the new spent total
    ///
    /// Returns `None` if any of them overflows.
    fn stage(
        &self,
        expense: &Expense,
        split: &[&ParticipantId],
        share: Decimal,
    ) -> Option<(Balances, Decimal)> {
        let mut staged = Balances::new();

        if let Some(balance) = self.balances.get(&expense.paid_by) {
            staged.insert(expense.paid_by.clone(), balance.checked_add(expense.amount)?);
        }

        for &id in split {
            let current = match staged.get(id) {
                Some(value) => *value,
                None => *self.balances.get(id)?,
            };
            staged.insert(id.clone(), current.checked_sub(share)?);
        }

        let total_spent = self.total_spent.checked_add(expense.amount)?;
        Some((staged, total_spent))
    }

    /// Split ids that belong to known participants
    fn valid_split<'a>(&self, expense: &'a Expense) -> Vec<&'a ParticipantId> {
        expense
            .split_between
            .iter()
            .filter(|id| self.is_known(id))
            .collect()
    }
}

/// Whether a participant paid for or shares in any of the expenses
///
/// A participant who is involved in a group's expenses cannot be removed
/// from the group without invalidating its balances.
pub fn is_involved(participant: &str, expenses: &[Expense]) -> bool {
    expenses.iter().any(|expense| expense.involves(participant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn max_and_erika() -> Vec<Participant> {
        vec![Participant::new("u1", "Max"), Participant::new("u2", "Erika")]
    }

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_no_expenses_yields_zero_balance_per_participant() {
        let balances = BalanceLedger::compute(&max_and_erika(), &[]);

        assert_eq!(balances.len(), 2);
        assert_eq!(balances["u1"], Decimal::ZERO);
        assert_eq!(balances["u2"], Decimal::ZERO);
    }

    #[rstest]
    #[case::single_expense(
        vec![Expense::new(dec(20), "u1", ["u1", "u2"])],
        dec(10)
    )]
    #[case::ghost_in_split(
        vec![Expense::new(dec(30), "u1", ["u1", "u2", "ghost"])],
        dec(15)
    )]
    #[case::two_expenses_net_out(
        vec![
            Expense::new(dec(40), "u1", ["u1", "u2"]),
            Expense::new(dec(10), "u2", ["u1", "u2"]),
        ],
        dec(15)
    )]
    fn test_two_participant_scenarios(#[case] expenses: Vec<Expense>, #[case] max_is_owed: Decimal) {
        let balances = BalanceLedger::compute(&max_and_erika(), &expenses);

        assert_eq!(balances["u1"], max_is_owed);
        assert_eq!(balances["u2"], -max_is_owed);
    }

    #[test]
    fn test_split_of_only_unknown_ids_contributes_nothing() {
        let expenses = vec![Expense::new(dec(50), "u1", ["ghost", "phantom"])];
        let mut ledger = BalanceLedger::new(&max_and_erika());

        assert_eq!(ledger.apply(&expenses[0]), Ok(LedgerOutcome::Skipped));
        assert!(ledger.balances().values().all(|b| b.is_zero()));
        assert_eq!(ledger.summary().skipped_expenses, 1);
        assert_eq!(ledger.summary().total_spent, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_payer_applies_debit_side_only() {
        let mut ledger = BalanceLedger::new(&max_and_erika());
        let outcome = ledger.apply(&Expense::new(dec(20), "ghost", ["u1", "u2"]));

        assert_eq!(outcome, Ok(LedgerOutcome::AppliedWithoutPayer));
        assert_eq!(ledger.balances()["u1"], dec(-10));
        assert_eq!(ledger.balances()["u2"], dec(-10));
    }

    #[test]
    fn test_three_way_split_conserves_money() {
        let participants = vec![
            Participant::new("a", "Anna"),
            Participant::new("b", "Ben"),
            Participant::new("c", "Cleo"),
        ];
        let expenses = vec![Expense::new(dec(10), "a", ["a", "b", "c"])];

        let balances = BalanceLedger::compute(&participants, &expenses);
        let sum: Decimal = balances.values().sum();

        assert!(sum.abs() < Decimal::new(1, 6));
        assert!(balances["a"] > Decimal::ZERO);
        assert_eq!(balances["b"], balances["c"]);
    }

    #[test]
    fn test_duplicate_participant_ids_collapse() {
        let participants = vec![
            Participant::new("u1", "Max"),
            Participant::new("u1", "Max again"),
        ];
        let ledger = BalanceLedger::new(&participants);
        assert_eq!(ledger.summary().participants, 1);
    }

    #[rstest]
    #[case::unknown_payer(Expense::new(dec(20), "ghost", ["u1"]), "unknown_payer")]
    #[case::empty_split(Expense::new(dec(20), "u1", ["ghost"]), "empty_split")]
    #[case::zero_amount(Expense::new(Decimal::ZERO, "u1", ["u2"]), "non_positive_amount")]
    #[case::negative_amount(Expense::new(dec(-5), "u1", ["u2"]), "non_positive_amount")]
    fn test_apply_checked_rejects_without_applying(
        #[case] expense: Expense,
        #[case] reason: &str,
    ) {
        let mut ledger = BalanceLedger::new(&max_and_erika());

        let error = ledger.apply_checked(&expense).unwrap_err();

        assert_eq!(error.reason_code(), reason);
        assert!(ledger.balances().values().all(|b| b.is_zero()));
        assert_eq!(ledger.summary().skipped_expenses, 1);
        assert_eq!(ledger.expenses_seen(), 1);
    }

    #[test]
    fn test_apply_checked_on_empty_ledger() {
        let mut ledger = BalanceLedger::new(&[]);
        let error = ledger
            .apply_checked(&Expense::new(dec(20), "u1", ["u1"]))
            .unwrap_err();
        assert_eq!(error, ValidationError::EmptyParticipants);
    }

    #[test]
    fn test_apply_checked_reports_expense_index() {
        let mut ledger = BalanceLedger::new(&max_and_erika());
        ledger
            .apply_checked(&Expense::new(dec(20), "u1", ["u1", "u2"]))
            .unwrap();

        let error = ledger
            .apply_checked(&Expense::new(dec(20), "ghost", ["u1"]))
            .unwrap_err();

        assert_eq!(
            error,
            ValidationError::UnknownPayer {
                index: 1,
                paid_by: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut ledger = BalanceLedger::new(&max_and_erika());
        ledger.apply(&Expense::new(dec(40), "u1", ["u1", "u2"])).unwrap();
        ledger.apply(&Expense::new(dec(10), "u2", ["u1", "u2"])).unwrap();
        ledger.apply(&Expense::new(dec(99), "u2", ["ghost"])).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.participants, 2);
        assert_eq!(summary.applied_expenses, 2);
        assert_eq!(summary.skipped_expenses, 1);
        assert_eq!(summary.total_spent, dec(50));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let expenses = vec![
            Expense::new(dec(100), "u1", ["u1", "u2"]),
            Expense::new(Decimal::new(3333, 2), "u2", ["u1", "u2"]),
        ];
        let first = BalanceLedger::compute(&max_and_erika(), &expenses);
        let second = BalanceLedger::compute(&max_and_erika(), &expenses);
        assert_eq!(first, second);
    }

    fn near_max() -> Decimal {
        Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0)
    }

    #[rstest]
    #[case::lenient(false)]
    #[case::checked(true)]
    fn test_overflowing_expense_is_rejected_whole(#[case] checked: bool) {
        let mut ledger = BalanceLedger::new(&max_and_erika());
        let expense = Expense::new(near_max(), "u1", ["u1", "u2"]);
        let apply = |ledger: &mut BalanceLedger| {
            if checked {
                ledger.apply_checked(&expense)
            } else {
                ledger.apply(&expense)
            }
        };

        assert_eq!(apply(&mut ledger), Ok(LedgerOutcome::Applied));
        let before = ledger.balances().clone();

        assert_eq!(
            apply(&mut ledger),
            Err(ValidationError::AmountOverflow { index: 1 })
        );
        assert_eq!(ledger.balances(), &before);

        let summary = ledger.summary();
        assert_eq!(summary.applied_expenses, 1);
        assert_eq!(summary.skipped_expenses, 1);
        assert_eq!(summary.total_spent, near_max());
    }

    #[test]
    fn test_compute_skips_overflowing_expense() {
        let expense = Expense::new(near_max(), "u1", ["u1", "u2"]);
        let balances = BalanceLedger::compute(&max_and_erika(), &[expense.clone(), expense]);

        let half = near_max() / dec(2);
        assert_eq!(balances["u1"], half);
        assert_eq!(balances["u2"], -half);
    }

    #[rstest]
    #[case::payer("u1", true)]
    #[case::split_member("u2", true)]
    #[case::not_involved("u3", false)]
    fn test_is_involved(#[case] participant: &str, #[case] expected: bool) {
        let expenses = vec![Expense::new(dec(20), "u1", ["u1", "u2"])];
        assert_eq!(is_involved(participant, &expenses), expected);
    }
}

//! Settlement planning
//!
//! Converts a balance map into an ordered list of transfers that zeroes every
//! balance, using greedy matching of the largest debtor against the largest
//! creditor.
//!
//! The plan is not always globally transfer-minimal (that variant is NP-hard),
//! but it is deterministic, runs in `O(n log n)` and never emits more than
//! `debtors + creditors - 1` transfers.

use crate::types::{Balances, Transfer};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Settlement tolerance (0.01)
///
/// Any balance or remaining amount whose magnitude is at most this value is
/// treated as settled.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Whether an amount is within the settlement tolerance of zero
pub fn is_settled(value: Decimal) -> bool {
    value.abs() <= EPSILON
}

/// Greedy two-cursor settlement planner
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Produce a transfer plan for the given balances
    ///
    /// Debtors are ordered by largest debt first and creditors by largest
    /// credit first; equal amounts are ordered by ascending participant id.
    ///
    /// # Returns
    ///
    /// The ordered transfers, empty when every balance is already settled.
    pub fn plan(balances: &Balances) -> Vec<Transfer> {
        let mut debtors: Vec<(&str, Decimal)> = balances
            .iter()
            .filter(|(_, value)| **value < -EPSILON)
            .map(|(id, value)| (id.as_str(), -*value))
            .collect();
        let mut creditors: Vec<(&str, Decimal)> = balances
            .iter()
            .filter(|(_, value)| **value > EPSILON)
            .map(|(id, value)| (id.as_str(), *value))
            .collect();

        // Both lists hold positive magnitudes at this point
        debtors.sort_by(largest_first);
        creditors.sort_by(largest_first);

        let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);
        let mut debt_left = debtors.first().map(|(_, amount)| *amount).unwrap_or_default();
        let mut credit_left = creditors.first().map(|(_, amount)| *amount).unwrap_or_default();

        while i < debtors.len() && j < creditors.len() {
            let amount = debt_left.min(credit_left);

            if amount > EPSILON {
                transfers.push(Transfer::new(debtors[i].0, creditors[j].0, amount));
            }

            debt_left -= amount;
            credit_left -= amount;

            if is_settled(debt_left) {
                i += 1;
                debt_left = debtors.get(i).map(|(_, amount)| *amount).unwrap_or_default();
            }
            if is_settled(credit_left) {
                j += 1;
                credit_left = creditors.get(j).map(|(_, amount)| *amount).unwrap_or_default();
            }
        }

        transfers
    }
}

fn largest_first(a: &(&str, Decimal), b: &(&str, Decimal)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Apply a transfer plan to a set of balances
///
/// Paying `amount` reduces the payer's debt (their balance rises) and the
/// receiver's credit (their balance falls). Participants missing from
/// `balances` start at zero.
pub fn apply_transfers(balances: &Balances, transfers: &[Transfer]) -> Balances {
    let mut settled = balances.clone();
    for transfer in transfers {
        *settled.entry(transfer.from.clone()).or_default() += transfer.amount;
        *settled.entry(transfer.to.clone()).or_default() -= transfer.amount;
    }
    settled
}

//! Traits for the external collaborators the engine consumes
//!
//! Membership and expense persistence live outside this crate. These traits
//! describe the already-resolved data the engine needs from them, so any
//! store (in-memory, CSV, database) can feed [`crate::core::SettlementEngine`].

use crate::types::{Expense, ExpenseRecord, GroupId, Participant};

/// Source of the current participants of a group
pub trait ParticipantSource {
    /// Current participants of the group, empty if the group is unknown
    fn participants(&self, group: &str) -> Vec<Participant>;

    /// All groups known to this source, in ascending order
    fn groups(&self) -> Vec<GroupId>;
}

/// Source of the current expenses of a group
pub trait ExpenseSource {
    /// Current expenses of the group in recorded order
    fn expenses(&self, group: &str) -> Vec<Expense>;
}

impl ExpenseSource for [ExpenseRecord] {
    fn expenses(&self, group: &str) -> Vec<Expense> {
        self.iter()
            .filter(|record| record.group == group)
            .map(|record| record.expense.clone())
            .collect()
    }
}

impl ExpenseSource for Vec<ExpenseRecord> {
    fn expenses(&self, group: &str) -> Vec<Expense> {
        self.as_slice().expenses(group)
    }
}

//! Settlement engine
//!
//! This module provides the `SettlementEngine` that ties validation, the
//! balance ledger and the settlement planner together.
//!
//! The engine enforces the configured validation policy:
//! - **Strict** (default): inputs are validated before any balance is computed
//!   and invalid expenses are rejected with a typed error
//! - **Lenient**: legacy best-effort behaviour; degraded expenses are applied
//!   as far as possible and logged

use crate::core::ledger::{BalanceLedger, LedgerOutcome};
use crate::core::planner::SettlementPlanner;
use crate::core::traits::{ExpenseSource, ParticipantSource};
use crate::core::validation::validate;
use crate::types::{Expense, Participant, Settlement, SettlementError, ValidationError};
use tracing::{debug, warn};

/// Group label used in logs when settling an anonymous participant list
const UNNAMED_GROUP: &str = "-";

/// How the engine treats caller-contract violations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reject invalid input with a [`ValidationError`]
    #[default]
    Strict,

    /// Skip unattributable expenses and ignore unknown payers
    Lenient,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Validation policy
    pub validation: ValidationMode,
}

impl EngineConfig {
    /// Configuration with the given validation mode
    pub fn new(validation: ValidationMode) -> Self {
        EngineConfig { validation }
    }
}

/// Settlement engine
///
/// Stateless apart from its configuration; safe to share across threads and
/// to call concurrently with disjoint inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    /// Create a new SettlementEngine
    pub fn new(config: EngineConfig) -> Self {
        SettlementEngine { config }
    }

    /// The engine configuration
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Settle a group given its participants and expenses
    ///
    /// # Returns
    ///
    /// * `Ok(Settlement)` with balances, transfer plan and summary
    /// * `Err(SettlementError::Validation)` in strict mode if the input
    ///   violates the caller contract
    pub fn settle(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<Settlement, SettlementError> {
        self.fold(UNNAMED_GROUP, participants, expenses)
    }

    /// Settle one group read from external sources
    pub fn settle_group<P, E>(
        &self,
        participants: &P,
        expenses: &E,
        group: &str,
    ) -> Result<Settlement, SettlementError>
    where
        P: ParticipantSource + ?Sized,
        E: ExpenseSource + ?Sized,
    {
        debug!(group, "Settling group");
        self.fold(
            group,
            &participants.participants(group),
            &expenses.expenses(group),
        )
    }

    fn fold(
        &self,
        group: &str,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<Settlement, SettlementError> {
        if self.config.validation == ValidationMode::Strict {
            validate(participants, expenses)?;
        }

        let mut ledger = BalanceLedger::new(participants);
        for expense in expenses {
            let applied = self.apply_expense(group, &mut ledger, expense);
            // Lenient mode skips rejected expenses; they are already logged
            if self.config.validation == ValidationMode::Strict {
                applied?;
            }
        }

        Ok(Self::finish(ledger))
    }

    /// Apply one expense to a ledger under the configured policy
    ///
    /// Used by the streaming strategies, which fold expenses as they are read.
    /// Degraded and rejected expenses are logged with the group name.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the validation failure. In both modes, returns
    /// [`ValidationError::AmountOverflow`] if the expense would overflow a
    /// balance. The ledger is left unchanged apart from its skip counter.
    pub fn apply_expense(
        &self,
        group: &str,
        ledger: &mut BalanceLedger,
        expense: &Expense,
    ) -> Result<LedgerOutcome, ValidationError> {
        let index = ledger.expenses_seen();
        let description = expense.description.as_deref().unwrap_or("");

        let result = match self.config.validation {
            ValidationMode::Strict => ledger.apply_checked(expense),
            ValidationMode::Lenient => ledger.apply(expense),
        };

        match &result {
            Ok(LedgerOutcome::Applied) => {}
            Ok(LedgerOutcome::AppliedWithoutPayer) => warn!(
                group,
                index,
                paid_by = %expense.paid_by,
                description,
                "Payer is not a participant; credit side dropped"
            ),
            Ok(LedgerOutcome::Skipped) => warn!(
                group,
                index,
                description,
                "No known participant in split; expense skipped"
            ),
            Err(error) => warn!(
                group,
                index,
                reason = error.reason_code(),
                description,
                "Expense rejected: {}",
                error
            ),
        }

        result
    }

    /// Turn a folded ledger into a settlement
    pub fn finish(ledger: BalanceLedger) -> Settlement {
        let summary = ledger.summary();
        let balances = ledger.into_balances();
        let transfers = SettlementPlanner::plan(&balances);

        Settlement {
            balances,
            transfers,
            summary,
        }
    }
}

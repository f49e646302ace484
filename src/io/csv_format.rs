//! CSV format handling for group data and settlement reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for participant and expense input
//! - Conversion from CSV rows to domain types
//! - Report serialization (transfers, balances, summary)
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Input Formats
//!
//! ```text
//! group,id,name
//! trip,u1,Max
//!
//! group,amount,paid_by,split_between,description
//! trip,20.00,u1,u1;u2,Dinner
//! ```

use crate::cli::ReportKind;
use crate::core::GroupDirectory;
use crate::types::{Expense, ExpenseRecord, GroupId, Participant, Settlement, SettlementError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;
use tracing::warn;

/// Separator between participant ids in the `split_between` column
pub const SPLIT_SEPARATOR: char = ';';

/// A CSV row type that converts into a domain value
pub trait CsvRecord: DeserializeOwned + Send {
    /// Domain value produced by a valid row
    type Output: Send;

    /// Convert the deserialized row into its domain value
    fn convert(self) -> Result<Self::Output, SettlementError>;
}

/// Participant row: `group,id,name`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParticipantCsvRecord {
    pub group: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CsvRecord for ParticipantCsvRecord {
    type Output = (GroupId, Participant);

    /// Convert a participant row
    ///
    /// Group and id must be non-empty. A missing or empty name falls back to
    /// the id.
    fn convert(self) -> Result<Self::Output, SettlementError> {
        let group = required("group", self.group)?;
        let id = required("id", self.id)?;
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.clone());

        Ok((group, Participant { id, name }))
    }
}

/// Expense row: `group,amount,paid_by,split_between[,description]`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExpenseCsvRecord {
    pub group: String,
    pub amount: String,
    pub paid_by: String,
    pub split_between: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CsvRecord for ExpenseCsvRecord {
    type Output = ExpenseRecord;

    /// Convert an expense row
    ///
    /// This function:
    /// - Parses the amount into a Decimal
    /// - Splits `split_between` on `;`, dropping empty entries
    /// - Requires non-empty group and payer
    ///
    /// Whether the amount is positive and the ids are known is left to the
    /// engine's validation policy.
    fn convert(self) -> Result<Self::Output, SettlementError> {
        let group = required("group", self.group)?;
        let paid_by = required("paid_by", self.paid_by)?;

        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| SettlementError::invalid_amount(&self.amount, &group))?;

        let split_between = self
            .split_between
            .split(SPLIT_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let mut expense = Expense::new(amount, paid_by, split_between);
        expense.description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(ExpenseRecord { group, expense })
    }
}

fn required(field: &str, value: String) -> Result<String, SettlementError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SettlementError::parse_error(
            None,
            format!("Missing value for '{}'", field),
        ));
    }
    Ok(value.to_string())
}

/// Build a participant directory from converted participant rows
///
/// Bad rows and duplicate ids are logged and skipped; the first occurrence of
/// an id in a group wins.
pub fn collect_directory<I>(rows: I) -> GroupDirectory
where
    I: IntoIterator<Item = Result<(GroupId, Participant), SettlementError>>,
{
    let mut directory = GroupDirectory::new();

    for row in rows {
        match row {
            Ok((group, participant)) => {
                if let Err(e) = directory.insert(&group, participant) {
                    warn!(group = %group, reason = e.reason_code(), "Participant ignored: {}", e);
                }
            }
            Err(e) => warn!("Participant row skipped: {}", e),
        }
    }

    directory
}

/// Format a money amount with two decimals, rounding half away from zero
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Write the selected report for all settled groups
///
/// Groups are written in ascending group id order; names are resolved
/// through the directory and fall back to the id.
pub fn write_report(
    kind: ReportKind,
    settlements: &BTreeMap<GroupId, Settlement>,
    directory: &GroupDirectory,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    match kind {
        ReportKind::Transfers => write_transfers_csv(settlements, directory, output),
        ReportKind::Balances => write_balances_csv(settlements, directory, output),
        ReportKind::Summary => write_summary_csv(settlements, output),
    }
}

/// Write transfer plans: `group,from,from_name,to,to_name,amount`
pub fn write_transfers_csv(
    settlements: &BTreeMap<GroupId, Settlement>,
    directory: &GroupDirectory,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["group", "from", "from_name", "to", "to_name", "amount"])?;

    for (group, settlement) in settlements {
        for transfer in &settlement.transfers {
            writer.write_record([
                group.as_str(),
                transfer.from.as_str(),
                directory.display_name(group, &transfer.from),
                transfer.to.as_str(),
                directory.display_name(group, &transfer.to),
                format_amount(transfer.amount).as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write net balances: `group,participant,name,balance`
pub fn write_balances_csv(
    settlements: &BTreeMap<GroupId, Settlement>,
    directory: &GroupDirectory,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["group", "participant", "name", "balance"])?;

    for (group, settlement) in settlements {
        for (id, balance) in &settlement.balances {
            writer.write_record([
                group.as_str(),
                id.as_str(),
                directory.display_name(group, id),
                format_amount(*balance).as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write per-group counters: `group,participants,expenses,skipped,total_spent,transfers`
pub fn write_summary_csv(
    settlements: &BTreeMap<GroupId, Settlement>,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "group",
        "participants",
        "expenses",
        "skipped",
        "total_spent",
        "transfers",
    ])?;

    for (group, settlement) in settlements {
        let summary = &settlement.summary;
        writer.write_record([
            group.clone(),
            summary.participants.to_string(),
            summary.applied_expenses.to_string(),
            summary.skipped_expenses.to_string(),
            format_amount(summary.total_spent),
            settlement.transfers.len().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

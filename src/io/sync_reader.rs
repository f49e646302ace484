//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over participant or expense rows from a CSV
//! file. Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! `SyncReader<T>` yields `Result<T::Output, SettlementError>` for each CSV
//! row, where `T` is one of the row types in [`crate::io::csv_format`]:
//!
//! ```no_run
//! use settle_up::io::csv_format::ExpenseCsvRecord;
//! use settle_up::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::<ExpenseCsvRecord>::new(Path::new("expenses.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Expense in {}: {}", record.group, record.expense.amount),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::CsvRecord;
use crate::types::SettlementError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads rows one at a time; memory use does not grow with the file size.
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<T: CsvRecord> SyncReader<T> {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (for the optional trailing column)
    /// - Use an 8KB buffer for efficient I/O
    pub fn new(path: &Path) -> Result<Self, SettlementError> {
        let file = File::open(path).map_err(|e| SettlementError::open_error(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            _row: PhantomData,
        })
    }
}

impl<T: CsvRecord> Iterator for SyncReader<T> {
    type Item = Result<T::Output, SettlementError>;

    /// Get the next row from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(T::Output))` - Successfully converted row
    /// * `Some(Err(SettlementError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T>();
        let row = deserializer.next()?;

        self.line_num += 1;
        // +1 for the header line
        let line = self.line_num + 1;

        Some(
            row.map_err(SettlementError::from)
                .and_then(T::convert)
                .map_err(|e| e.at_line(line)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{ExpenseCsvRecord, ParticipantCsvRecord};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn read_expenses(content: &str) -> Vec<Result<crate::types::ExpenseRecord, SettlementError>> {
        let file = create_temp_csv(content);
        SyncReader::<ExpenseCsvRecord>::new(file.path())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::<ExpenseCsvRecord>::new(Path::new("nonexistent.csv"));
        assert_eq!(
            result.unwrap_err(),
            SettlementError::FileNotFound {
                path: "nonexistent.csv".to_string()
            }
        );
    }

    #[test]
    fn test_sync_reader_reads_participants() {
        let file = create_temp_csv("group,id,name\ntrip,u1,Max\ntrip,u2,\n");

        let rows: Vec<_> = SyncReader::<ParticipantCsvRecord>::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "trip");
        assert_eq!(rows[0].1.name, "Max");
        assert_eq!(rows[1].1.name, "u2");
    }

    #[test]
    fn test_sync_reader_reads_expenses_with_optional_description() {
        let records = read_expenses(
            "group,amount,paid_by,split_between,description\n\
             trip,20.00,u1,u1;u2,Dinner\n\
             trip,5,u2,u1\n",
        );

        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.expense.amount, Decimal::new(2000, 2));
        assert_eq!(first.expense.description.as_deref(), Some("Dinner"));
        let second = records[1].as_ref().unwrap();
        assert_eq!(second.expense.description, None);
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let records = read_expenses(
            "group,amount,paid_by,split_between\n  trip  ,  12.5 ,  u1 , u1 ; u2 \n",
        );

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.group, "trip");
        assert_eq!(record.expense.amount, Decimal::new(125, 1));
        assert_eq!(record.expense.split_between.len(), 2);
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_and_continues() {
        let records = read_expenses(
            "group,amount,paid_by,split_between\n\
             trip,10,u1,u1\n\
             trip,abc,u1,u1\n\
             trip,5,u2,u2\n",
        );

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err().to_string();
        assert!(error.contains("line 3"), "got: {}", error);
        assert!(error.contains("Invalid amount 'abc'"), "got: {}", error);
    }

    #[test]
    fn test_sync_reader_reports_missing_columns() {
        let records = read_expenses("group,amount,paid_by,split_between\ntrip,10\n");

        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0],
            Err(SettlementError::ParseError { line: Some(_), .. })
        ));
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        assert!(read_expenses("group,amount,paid_by,split_between\n").is_empty());
    }
}

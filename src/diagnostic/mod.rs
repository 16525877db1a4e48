//! Per-handle diagnostic records.
//!
//! Each public statement call resets the storage, runs, and then stores one
//! header record with the call's return code. Failures and warnings add
//! status records that the caller can inspect afterwards, the way
//! `SQLGetDiagRec` walks them.

use crate::error::{SqlResult, SqlState, StatementError};

/// Row number value used when a record is not tied to a row.
pub const ROW_NUMBER_UNKNOWN: i64 = -2;

/// Column number value used when a record is not tied to a column.
pub const COLUMN_NUMBER_UNKNOWN: i32 = -2;

/// A single status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// SQLSTATE of the record
    pub sql_state: SqlState,
    /// Human-readable message
    pub message: String,
    /// Row the record refers to
    pub row_number: i64,
    /// Column the record refers to
    pub column_number: i32,
}

impl DiagnosticRecord {
    /// Create a record that is not tied to a row or column.
    pub fn new(sql_state: SqlState, message: impl Into<String>) -> Self {
        Self {
            sql_state,
            message: message.into(),
            row_number: ROW_NUMBER_UNKNOWN,
            column_number: COLUMN_NUMBER_UNKNOWN,
        }
    }

    /// Attach row and column context.
    pub fn with_position(mut self, row_number: i64, column_number: i32) -> Self {
        self.row_number = row_number;
        self.column_number = column_number;
        self
    }
}

/// Header record plus status records of the last call.
#[derive(Debug, Clone)]
pub struct DiagnosticRecordStorage {
    result: SqlResult,
    row_count: i64,
    records: Vec<DiagnosticRecord>,
}

impl Default for DiagnosticRecordStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRecordStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self {
            result: SqlResult::Success,
            row_count: 0,
            records: Vec::new(),
        }
    }

    /// Drop every record and restore the header to its initial state.
    pub fn reset(&mut self) {
        self.result = SqlResult::Success;
        self.row_count = 0;
        self.records.clear();
    }

    /// Set the return code of the call.
    pub fn set_header_record(&mut self, result: SqlResult) {
        self.result = result;
    }

    /// Set the row count reported by the header record.
    pub fn set_row_count(&mut self, row_count: i64) {
        self.row_count = row_count;
    }

    /// Append a status record.
    pub fn add_status_record(&mut self, record: DiagnosticRecord) {
        self.records.push(record);
    }

    /// Append the status record describing `err`.
    pub fn add_error(&mut self, err: &StatementError) {
        let record = DiagnosticRecord::new(err.sql_state(), err.to_string()).with_position(
            ROW_NUMBER_UNKNOWN,
            err.column().unwrap_or(COLUMN_NUMBER_UNKNOWN),
        );
        self.add_status_record(record);
    }

    /// Return code of the last call.
    pub fn header_result(&self) -> SqlResult {
        self.result
    }

    /// Row count of the header record.
    pub fn row_count(&self) -> i64 {
        self.row_count
    }

    /// Number of status records.
    pub fn status_records_number(&self) -> usize {
        self.records.len()
    }

    /// Status record by 1-based index, as ODBC numbers them.
    pub fn status_record(&self, idx: usize) -> Option<&DiagnosticRecord> {
        idx.checked_sub(1).and_then(|i| self.records.get(i))
    }

    /// All status records in insertion order.
    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    /// Whether the last call failed.
    pub fn is_error(&self) -> bool {
        self.result == SqlResult::Error
    }
}

/// Something that owns diagnostic records.
pub trait Diagnosable {
    /// Records of the last call.
    fn diagnostic_records(&self) -> &DiagnosticRecordStorage;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_storage_is_clean() {
        let storage = DiagnosticRecordStorage::new();
        assert_eq!(storage.header_result(), SqlResult::Success);
        assert_eq!(storage.status_records_number(), 0);
        assert!(storage.status_record(1).is_none());
    }

    #[test]
    fn test_status_records_are_one_based() {
        let mut storage = DiagnosticRecordStorage::new();
        storage.add_status_record(DiagnosticRecord::new(
            SqlState::Hy010SequenceError,
            "Query is not prepared.",
        ));

        assert!(storage.status_record(0).is_none());
        let record = storage.status_record(1).unwrap();
        assert_eq!(record.sql_state, SqlState::Hy010SequenceError);
        assert_eq!(record.row_number, ROW_NUMBER_UNKNOWN);
        assert_eq!(record.column_number, COLUMN_NUMBER_UNKNOWN);
    }

    #[test]
    fn test_add_error_keeps_column_context() {
        let mut storage = DiagnosticRecordStorage::new();
        storage.add_error(&StatementError::General {
            message: "Column index is out of range.".to_string(),
            column: Some(5),
        });

        let record = storage.status_record(1).unwrap();
        assert_eq!(record.sql_state, SqlState::Hy000GeneralError);
        assert_eq!(record.column_number, 5);
        assert_eq!(record.message, "Column index is out of range.");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut storage = DiagnosticRecordStorage::new();
        storage.set_header_record(SqlResult::Error);
        storage.set_row_count(3);
        storage.add_error(&StatementError::general("boom"));

        storage.reset();

        assert_eq!(storage.header_result(), SqlResult::Success);
        assert_eq!(storage.row_count(), 0);
        assert!(storage.records().is_empty());
        assert!(!storage.is_error());
    }
}

//! Query executors.
//!
//! A statement holds at most one active query. Each variant implements the
//! [`Query`] capability set, and the statement drives it only through that
//! trait:
//! - `data` - SQL text executed on the server, rows paged through a cursor
//! - `column_metadata` - column listing (`SQLColumns`)
//! - `table_metadata` - table listing (`SQLTables`)
//! - `foreign_keys` - foreign key listing (`SQLForeignKeys`)
//! - `primary_keys` - primary key listing (`SQLPrimaryKeys`)

pub mod column_metadata;
pub mod cursor;
pub mod data;
pub mod foreign_keys;
pub mod primary_keys;
mod rows;
pub mod table_metadata;

pub use column_metadata::ColumnMetadataQuery;
pub use cursor::Cursor;
pub use data::DataQuery;
pub use foreign_keys::ForeignKeysQuery;
pub use primary_keys::PrimaryKeysQuery;
pub use table_metadata::TableMetadataQuery;

use crate::app::{ColumnBindingMap, ConversionResult};
use crate::error::{SqlResult, StatementError};
use crate::meta::{ColumnMeta, ColumnMetaVector};
use crate::types::SqlType;
use serde_json::Value;

/// Capability set shared by every query variant.
pub trait Query {
    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns `StatementError` if the query is in the wrong state or the
    /// server request fails.
    fn execute(&mut self) -> Result<SqlResult, StatementError>;

    /// Write the next row into the bound column buffers.
    ///
    /// Returns `None` past the last row.
    ///
    /// # Errors
    ///
    /// Returns `StatementError` if the query was not executed, a bound
    /// column does not exist or a value cannot be converted. The row is not
    /// consumed in that case, so the next fetch retries it.
    fn fetch_next_row(
        &mut self,
        columns: &ColumnBindingMap,
    ) -> Result<Option<RowWrite>, StatementError>;

    /// Release the query's cursor.
    ///
    /// # Errors
    ///
    /// Returns `StatementError` if the server fails to close the cursor. The
    /// query keeps its cursor in that case.
    fn close(&mut self) -> Result<SqlResult, StatementError>;

    /// Result set column metadata.
    fn meta(&self) -> &ColumnMetaVector;

    /// Whether more rows may be fetched.
    fn data_available(&self) -> bool;

    /// Rows changed by the query, zero for result set producing queries.
    fn affected_rows(&self) -> i64;
}

/// Build the fixed column layout of a metadata result set.
pub(crate) fn result_layout(columns: &[(&str, SqlType)]) -> ColumnMetaVector {
    columns
        .iter()
        .map(|(name, ty)| ColumnMeta::new("", "", *name, *ty))
        .collect()
}

/// Outcome of writing one row into the bound column buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowWrite {
    /// Bound columns whose value did not fit, in ascending order
    pub truncated: Vec<u16>,
}

impl RowWrite {
    /// `SuccessWithInfo` if any value was truncated.
    pub fn sql_result(&self) -> SqlResult {
        if self.truncated.is_empty() {
            SqlResult::Success
        } else {
            SqlResult::SuccessWithInfo
        }
    }
}

/// Copy one row into the bound column buffers.
pub(crate) fn write_row(
    row: &[Value],
    columns: &ColumnBindingMap,
) -> Result<RowWrite, StatementError> {
    let mut outcome = RowWrite::default();

    for (&idx, buffer) in columns.iter() {
        let value = usize::from(idx)
            .checked_sub(1)
            .and_then(|pos| row.get(pos))
            .ok_or_else(|| StatementError::General {
                message: "Column index is out of range.".to_string(),
                column: Some(i32::from(idx)),
            })?;

        match buffer.put_value(value) {
            ConversionResult::Success => {}
            ConversionResult::VarlenDataTruncated => outcome.truncated.push(idx),
            ConversionResult::Fail => {
                return Err(StatementError::RestrictedDataType {
                    column: i32::from(idx),
                    message: format!("cannot convert {} to {:?}", value, buffer.target_type()),
                })
            }
            ConversionResult::IndicatorRequired => {
                return Err(StatementError::IndicatorRequired {
                    column: i32::from(idx),
                })
            }
        }
    }

    Ok(outcome)
}

/// Text cell, NULL when empty.
pub(crate) fn nullable_string(value: &str) -> Value {
    if value.is_empty() {
        Value::Null
    } else {
        Value::String(value.to_string())
    }
}

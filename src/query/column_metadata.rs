//! Column metadata query (`SQLColumns`).

use super::rows::RowSet;
use super::{nullable_string, result_layout, Query, RowWrite};
use crate::app::ColumnBindingMap;
use crate::connection::Connection;
use crate::error::{SqlResult, StatementError};
use crate::meta::{ColumnMeta, ColumnMetaVector};
use crate::transport::ColumnsMetaRequest;
use crate::types::{SqlType, TypeMapper};
use serde_json::Value;

/// `SQL_NULLABLE_UNKNOWN`
const NULLABLE_UNKNOWN: i16 = 2;

/// Lists the columns of tables in a cache.
pub struct ColumnMetadataQuery<'c> {
    connection: &'c Connection,
    schema: String,
    table: String,
    column: String,
    layout: ColumnMetaVector,
    rows: RowSet,
}

impl<'c> ColumnMetadataQuery<'c> {
    /// Create the query. `schema` names the cache to search.
    pub fn new(connection: &'c Connection, schema: String, table: String, column: String) -> Self {
        Self {
            connection,
            schema,
            table,
            column,
            layout: result_layout(&[
                ("TABLE_CAT", SqlType::Varchar),
                ("TABLE_SCHEM", SqlType::Varchar),
                ("TABLE_NAME", SqlType::Varchar),
                ("COLUMN_NAME", SqlType::Varchar),
                ("DATA_TYPE", SqlType::SmallInt),
                ("TYPE_NAME", SqlType::Varchar),
                ("COLUMN_SIZE", SqlType::Integer),
                ("BUFFER_LENGTH", SqlType::Integer),
                ("DECIMAL_DIGITS", SqlType::SmallInt),
                ("NUM_PREC_RADIX", SqlType::SmallInt),
                ("NULLABLE", SqlType::SmallInt),
                ("REMARKS", SqlType::Varchar),
            ]),
            rows: RowSet::default(),
        }
    }

    /// Cache the query searches.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn to_row(column: &ColumnMeta) -> Vec<Value> {
        let ty = column.data_type;
        let nullable = match column.nullable {
            Some(nullable) => i16::from(nullable),
            None => NULLABLE_UNKNOWN,
        };

        vec![
            Value::Null,
            nullable_string(&column.schema_name),
            Value::from(column.table_name.clone()),
            Value::from(column.column_name.clone()),
            Value::from(TypeMapper::odbc_type(ty)),
            Value::from(TypeMapper::type_name(ty)),
            Value::from(column.precision.unwrap_or_else(|| TypeMapper::column_size(ty))),
            Value::from(TypeMapper::octet_length(ty)),
            column
                .scale
                .map(Value::from)
                .or_else(|| TypeMapper::decimal_digits(ty).map(Value::from))
                .unwrap_or(Value::Null),
            TypeMapper::num_prec_radix(ty).map_or(Value::Null, Value::from),
            Value::from(nullable),
            Value::Null,
        ]
    }
}

impl Query for ColumnMetadataQuery<'_> {
    fn execute(&mut self) -> Result<SqlResult, StatementError> {
        if self.rows.is_executed() {
            self.close()?;
        }

        let response = self.connection.get_columns_meta(&ColumnsMetaRequest {
            cache: self.schema.clone(),
            table: self.table.clone(),
            column: self.column.clone(),
        })?;

        log::debug!(
            "Found {} columns in cache '{}' for table '{}'",
            response.columns.len(),
            self.schema,
            self.table
        );

        self.rows
            .load(response.columns.iter().map(Self::to_row).collect());

        Ok(SqlResult::Success)
    }

    fn fetch_next_row(
        &mut self,
        columns: &ColumnBindingMap,
    ) -> Result<Option<RowWrite>, StatementError> {
        self.rows.fetch_into(columns)
    }

    fn close(&mut self) -> Result<SqlResult, StatementError> {
        self.rows.clear();
        Ok(SqlResult::Success)
    }

    fn meta(&self) -> &ColumnMetaVector {
        &self.layout
    }

    fn data_available(&self) -> bool {
        self.rows.data_available()
    }

    fn affected_rows(&self) -> i64 {
        0
    }
}

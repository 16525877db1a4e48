//! Table metadata query (`SQLTables`).

use super::rows::RowSet;
use super::{nullable_string, result_layout, Query, RowWrite};
use crate::app::ColumnBindingMap;
use crate::connection::Connection;
use crate::error::{SqlResult, StatementError};
use crate::meta::{ColumnMetaVector, TableMeta};
use crate::transport::TablesMetaRequest;
use crate::types::SqlType;
use serde_json::Value;

/// Lists the tables matching catalog, schema, table and type patterns.
pub struct TableMetadataQuery<'c> {
    connection: &'c Connection,
    catalog: String,
    schema: String,
    table: String,
    table_type: String,
    layout: ColumnMetaVector,
    rows: RowSet,
}

impl<'c> TableMetadataQuery<'c> {
    /// Create the query.
    pub fn new(
        connection: &'c Connection,
        catalog: String,
        schema: String,
        table: String,
        table_type: String,
    ) -> Self {
        Self {
            connection,
            catalog,
            schema,
            table,
            table_type,
            layout: result_layout(&[
                ("TABLE_CAT", SqlType::Varchar),
                ("TABLE_SCHEM", SqlType::Varchar),
                ("TABLE_NAME", SqlType::Varchar),
                ("TABLE_TYPE", SqlType::Varchar),
                ("REMARKS", SqlType::Varchar),
            ]),
            rows: RowSet::default(),
        }
    }

    /// Schema pattern the query searches.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn to_row(table: &TableMeta) -> Vec<Value> {
        vec![
            nullable_string(&table.catalog_name),
            nullable_string(&table.schema_name),
            Value::from(table.table_name.clone()),
            Value::from(table.table_type.clone()),
            Value::Null,
        ]
    }
}

impl Query for TableMetadataQuery<'_> {
    fn execute(&mut self) -> Result<SqlResult, StatementError> {
        if self.rows.is_executed() {
            self.close()?;
        }

        let response = self.connection.get_tables_meta(&TablesMetaRequest {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
            table_type: self.table_type.clone(),
        })?;

        log::debug!("Found {} tables", response.tables.len());

        self.rows
            .load(response.tables.iter().map(Self::to_row).collect());

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

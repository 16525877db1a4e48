//! Primary keys query (`SQLPrimaryKeys`).
//!
//! Every cache entry is addressed by its `_KEY` column, so the answer is a
//! single synthetic row describing that column. The server is not asked.

use super::rows::RowSet;
use super::{nullable_string, result_layout, Query, RowWrite};
use crate::app::ColumnBindingMap;
use crate::error::{SqlResult, StatementError};
use crate::meta::ColumnMetaVector;
use crate::types::SqlType;
use serde_json::Value;

const KEY_COLUMN: &str = "_KEY";

/// Lists the primary key columns of a table.
pub struct PrimaryKeysQuery {
    catalog: String,
    schema: String,
    table: String,
    layout: ColumnMetaVector,
    rows: RowSet,
}

impl PrimaryKeysQuery {
    /// Create the query.
    pub fn new(catalog: String, schema: String, table: String) -> Self {
        Self {
            catalog,
            schema,
            table,
            layout: result_layout(&[
                ("TABLE_CAT", SqlType::Varchar),
                ("TABLE_SCHEM", SqlType::Varchar),
                ("TABLE_NAME", SqlType::Varchar),
                ("COLUMN_NAME", SqlType::Varchar),
                ("KEY_SEQ", SqlType::SmallInt),
                ("PK_NAME", SqlType::Varchar),
            ]),
            rows: RowSet::default(),
        }
    }
}

impl Query for PrimaryKeysQuery {
    fn execute(&mut self) -> Result<SqlResult, StatementError> {
        if self.rows.is_executed() {
            self.close()?;
        }

        self.rows.load(vec![vec![
            nullable_string(&self.catalog),
            Value::from(self.schema.clone()),
            Value::from(self.table.clone()),
            Value::from(KEY_COLUMN),
            Value::from(1),
            Value::from(KEY_COLUMN),
        ]]);

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

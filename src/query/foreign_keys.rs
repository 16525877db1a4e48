//! Foreign keys query (`SQLForeignKeys`).
//!
//! The grid has no foreign key constraints, so the result set is always
//! empty. Only the column layout is meaningful.

use super::rows::RowSet;
use super::{result_layout, Query, RowWrite};
use crate::app::ColumnBindingMap;
use crate::error::{SqlResult, StatementError};
use crate::meta::ColumnMetaVector;
use crate::types::SqlType;

/// Names of the primary and foreign key tables a request refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    /// Catalog name
    pub catalog: String,
    /// Schema name
    pub schema: String,
    /// Table name
    pub table: String,
}

impl KeyTable {
    /// Create a table reference.
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// Lists foreign keys between two tables.
pub struct ForeignKeysQuery {
    primary: KeyTable,
    foreign: KeyTable,
    layout: ColumnMetaVector,
    rows: RowSet,
}

impl ForeignKeysQuery {
    /// Create the query.
    pub fn new(primary: KeyTable, foreign: KeyTable) -> Self {
        Self {
            primary,
            foreign,
            layout: result_layout(&[
                ("PKTABLE_CAT", SqlType::Varchar),
                ("PKTABLE_SCHEM", SqlType::Varchar),
                ("PKTABLE_NAME", SqlType::Varchar),
                ("PKCOLUMN_NAME", SqlType::Varchar),
                ("FKTABLE_CAT", SqlType::Varchar),
                ("FKTABLE_SCHEM", SqlType::Varchar),
                ("FKTABLE_NAME", SqlType::Varchar),
                ("FKCOLUMN_NAME", SqlType::Varchar),
                ("KEY_SEQ", SqlType::SmallInt),
                ("UPDATE_RULE", SqlType::SmallInt),
                ("DELETE_RULE", SqlType::SmallInt),
                ("FK_NAME", SqlType::Varchar),
                ("PK_NAME", SqlType::Varchar),
                ("DEFERRABILITY", SqlType::SmallInt),
            ]),
            rows: RowSet::default(),
        }
    }
}

impl Query for ForeignKeysQuery {
    fn execute(&mut self) -> Result<SqlResult, StatementError> {
        log::debug!(
            "Foreign keys requested between {:?} and {:?}",
            self.primary,
            self.foreign
        );

        self.rows.load(Vec::new());
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

//! SQL data query.

use super::{write_row, Cursor, Query, RowWrite};
use crate::app::{ColumnBindingMap, ParameterBindingMap};
use crate::connection::Connection;
use crate::error::{SqlResult, StatementError};
use crate::meta::ColumnMetaVector;
use crate::transport::{QueryCloseRequest, QueryExecuteRequest, QueryFetchRequest};
use std::cell::RefCell;
use std::rc::Rc;

/// Query that runs SQL text on the server and pages through its rows.
///
/// The parameter table is shared with the owning statement: parameter values
/// are read from application memory when [`Query::execute`] runs, so
/// rebinding between prepare and execute is honoured.
pub struct DataQuery<'c> {
    connection: &'c Connection,
    sql: String,
    params: Rc<RefCell<ParameterBindingMap>>,
    meta: ColumnMetaVector,
    cursor: Option<Cursor>,
    affected_rows: i64,
}

impl<'c> DataQuery<'c> {
    /// Create a data query; nothing is sent until it is executed.
    pub fn new(
        connection: &'c Connection,
        sql: String,
        params: Rc<RefCell<ParameterBindingMap>>,
    ) -> Self {
        Self {
            connection,
            sql,
            params,
            meta: ColumnMetaVector::new(),
            cursor: None,
            affected_rows: 0,
        }
    }

    /// SQL text of the query.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Query for DataQuery<'_> {
    fn execute(&mut self) -> Result<SqlResult, StatementError> {
        if self.cursor.is_some() {
            return Err(StatementError::sequence(
                "Query cursor is in open state already.",
            ));
        }

        let arguments = self
            .params
            .borrow()
            .iter()
            .map(|(_, param)| param.value())
            .collect();

        let request = QueryExecuteRequest {
            cache: self.connection.default_cache().to_string(),
            sql: self.sql.clone(),
            arguments,
        };

        let response = self.connection.execute_query(&request)?;

        log::debug!(
            "Query {} opened with {} columns",
            response.query_id,
            response.columns.len()
        );

        self.meta = response.columns;
        self.affected_rows = response.affected_rows;
        self.cursor = Some(Cursor::new(response.query_id));

        Ok(SqlResult::Success)
    }

    fn fetch_next_row(
        &mut self,
        columns: &ColumnBindingMap,
    ) -> Result<Option<RowWrite>, StatementError> {
        let connection = self.connection;
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| StatementError::invalid_cursor("Query was not executed."))?;

        if !cursor.has_data() {
            return Ok(None);
        }

        if cursor.needs_data() {
            let response = connection.fetch_query(&QueryFetchRequest {
                query_id: cursor.query_id(),
                page_size: connection.page_size(),
            })?;
            cursor.update_data(response);
        }

        let Some(row) = cursor.peek_row() else {
            return Ok(None);
        };

        let outcome = write_row(row, columns)?;
        cursor.advance();
        Ok(Some(outcome))
    }

    fn close(&mut self) -> Result<SqlResult, StatementError> {
        if let Some(cursor) = &self.cursor {
            self.connection.close_query(&QueryCloseRequest {
                query_id: cursor.query_id(),
            })?;
        }

        self.cursor = None;
        self.meta.clear();

        Ok(SqlResult::Success)
    }

    fn meta(&self) -> &ColumnMetaVector {
        &self.meta
    }

    fn data_available(&self) -> bool {
        self.cursor.as_ref().is_some_and(Cursor::has_data)
    }

    fn affected_rows(&self) -> i64 {
        self.affected_rows
    }
}

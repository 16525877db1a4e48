//! ODBC statement handle.
//!
//! A [`Statement`] owns the column and parameter binding tables and at most
//! one active query. Every public call resets the statement's diagnostics,
//! runs its internal counterpart and records the outcome: a header record
//! with the [`SqlResult`] plus a status record for each failure or warning.
//! Callers learn why a call failed from [`Diagnosable::diagnostic_records`].
//!
//! # Example
//!
//! ```no_run
//! # use ignite_odbc::app::{ApplicationDataBuffer, CDataType};
//! # use ignite_odbc::connection::Connection;
//! # use ignite_odbc::error::SqlResult;
//! # fn example(connection: &Connection) {
//! let mut name = [0u8; 64];
//! let mut name_len: isize = 0;
//!
//! let mut stmt = connection.create_statement();
//! let buffer = unsafe {
//!     ApplicationDataBuffer::new(
//!         CDataType::Char,
//!         name.as_mut_ptr().cast(),
//!         name.len() as isize,
//!         &mut name_len,
//!     )
//! };
//! stmt.bind_column(1, buffer);
//! stmt.execute_direct("SELECT name FROM Person");
//!
//! while stmt.fetch_row() == SqlResult::Success {
//!     // `name` holds the current row
//! }
//! stmt.close();
//! # }
//! ```

use crate::app::{ApplicationDataBuffer, ColumnBindingMap, Parameter, ParameterBindingMap};
use crate::connection::Connection;
use crate::diagnostic::{
    Diagnosable, DiagnosticRecord, DiagnosticRecordStorage, ROW_NUMBER_UNKNOWN,
};
use crate::error::{SqlResult, SqlState, StatementError};
use crate::meta::ColumnMetaVector;
use crate::query::foreign_keys::KeyTable;
use crate::query::{
    ColumnMetadataQuery, DataQuery, ForeignKeysQuery, PrimaryKeysQuery, Query, TableMetadataQuery,
};
use crate::utility::copy_string_to_buffer;
use std::cell::RefCell;
use std::fmt;
use std::ptr::{self, NonNull};
use std::rc::Rc;

/// Row status written for a fetched row (`SQL_ROW_SUCCESS`).
pub const SQL_ROW_SUCCESS: u16 = 0;

/// Lifecycle state of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementState {
    /// No active query
    Idle,
    /// Query constructed but not executed
    Prepared,
    /// Query executed, cursor may have rows
    Open,
}

/// Statement handle bound to a [`Connection`].
///
/// Created by [`Connection::create_statement`]. The statement is a single
/// threaded object: it refers to application memory through raw pointers
/// and is neither `Send` nor `Sync`.
pub struct Statement<'c> {
    connection: &'c Connection,
    column_bindings: ColumnBindingMap,
    /// Shared with the prepared data query, which reads it at execute time.
    param_bindings: Rc<RefCell<ParameterBindingMap>>,
    current_query: Option<Box<dyn Query + 'c>>,
    rows_fetched: Option<NonNull<usize>>,
    row_statuses: Option<NonNull<u16>>,
    state: StatementState,
    diagnostics: DiagnosticRecordStorage,
}

impl<'c> Statement<'c> {
    pub(crate) fn new(connection: &'c Connection) -> Self {
        Self {
            connection,
            column_bindings: ColumnBindingMap::new(),
            param_bindings: Rc::new(RefCell::new(ParameterBindingMap::new())),
            current_query: None,
            rows_fetched: None,
            row_statuses: None,
            state: StatementState::Idle,
            diagnostics: DiagnosticRecordStorage::new(),
        }
    }

    /// Connection the statement belongs to.
    pub fn connection(&self) -> &'c Connection {
        self.connection
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StatementState {
        self.state
    }

    // ------------------------------------------------------------------
    // Column binding
    // ------------------------------------------------------------------

    /// Bind an application buffer to a result column.
    ///
    /// Rebinding an index replaces the previous buffer. Column 0 is the
    /// bookmark column, which is not supported.
    ///
    /// # Arguments
    ///
    /// * `column_idx` - 1-based column number
    /// * `buffer` - Application buffer receiving the column values
    pub fn bind_column(&mut self, column_idx: u16, buffer: ApplicationDataBuffer) -> SqlResult {
        self.api_call(|stmt| {
            if column_idx == 0 {
                return Err(StatementError::General {
                    message: "Bookmark columns are not supported.".to_string(),
                    column: Some(0),
                });
            }
            stmt.column_bindings.bind(column_idx, buffer);
            Ok(SqlResult::Success)
        })
    }

    /// Remove the binding of a result column. Unbound indices are ignored.
    pub fn unbind_column(&mut self, column_idx: u16) -> SqlResult {
        self.api_call(|stmt| {
            stmt.column_bindings.unbind(column_idx);
            Ok(SqlResult::Success)
        })
    }

    /// Remove every column binding.
    pub fn unbind_all_columns(&mut self) -> SqlResult {
        self.api_call(|stmt| {
            stmt.column_bindings.unbind_all();
            Ok(SqlResult::Success)
        })
    }

    /// Install the column bind offset pointer (`SQL_ATTR_ROW_BIND_OFFSET_PTR`).
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must stay valid for reads until it is replaced or the
    /// statement is dropped, and every bound column buffer must be valid at
    /// each offset the application stores behind it.
    pub unsafe fn set_column_bind_offset_ptr(&mut self, ptr: *mut usize) {
        self.column_bindings.set_offset_ptr(ptr);
    }

    /// Installed column bind offset pointer, null when none.
    pub fn column_bind_offset_ptr(&self) -> *mut usize {
        self.column_bindings.offset_ptr()
    }

    /// Bound result columns.
    pub fn column_bindings(&self) -> &ColumnBindingMap {
        &self.column_bindings
    }

    // ------------------------------------------------------------------
    // Parameter binding
    // ------------------------------------------------------------------

    /// Bind an input parameter.
    ///
    /// The value is read from application memory when the query executes,
    /// so a prepared query observes rebinding done after `prepare`.
    pub fn bind_parameter(&mut self, param_idx: u16, param: Parameter) -> SqlResult {
        self.api_call(|stmt| {
            stmt.param_bindings.borrow_mut().bind(param_idx, param);
            Ok(SqlResult::Success)
        })
    }

    /// Remove the binding of a parameter. Unbound indices are ignored.
    pub fn unbind_parameter(&mut self, param_idx: u16) -> SqlResult {
        self.api_call(|stmt| {
            stmt.param_bindings.borrow_mut().unbind(param_idx);
            Ok(SqlResult::Success)
        })
    }

    /// Remove every parameter binding.
    pub fn unbind_all_parameters(&mut self) -> SqlResult {
        self.api_call(|stmt| {
            stmt.param_bindings.borrow_mut().unbind_all();
            Ok(SqlResult::Success)
        })
    }

    /// Number of bound parameters.
    pub fn parameters_number(&self) -> usize {
        self.param_bindings.borrow().len()
    }

    /// Install the parameter bind offset pointer
    /// (`SQL_ATTR_PARAM_BIND_OFFSET_PTR`).
    ///
    /// # Safety
    ///
    /// Same contract as [`Statement::set_column_bind_offset_ptr`], for the
    /// bound parameter buffers.
    pub unsafe fn set_param_bind_offset_ptr(&mut self, ptr: *mut usize) {
        self.param_bindings.borrow_mut().set_offset_ptr(ptr);
    }

    /// Installed parameter bind offset pointer, null when none.
    pub fn param_bind_offset_ptr(&self) -> *mut usize {
        self.param_bindings.borrow().offset_ptr()
    }

    // ------------------------------------------------------------------
    // Row status reporting
    // ------------------------------------------------------------------

    /// Install the rows-fetched counter (`SQL_ATTR_ROWS_FETCHED_PTR`).
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must stay valid for writes of one `usize` until it is
    /// replaced or the statement is dropped.
    pub unsafe fn set_rows_fetched_ptr(&mut self, ptr: *mut usize) {
        self.rows_fetched = NonNull::new(ptr);
    }

    /// Installed rows-fetched counter, null when none.
    pub fn rows_fetched_ptr(&self) -> *mut usize {
        self.rows_fetched.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Install the row status array (`SQL_ATTR_ROW_STATUS_PTR`).
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must stay valid for writes of at least one `u16`
    /// until it is replaced or the statement is dropped.
    pub unsafe fn set_row_statuses_ptr(&mut self, ptr: *mut u16) {
        self.row_statuses = NonNull::new(ptr);
    }

    /// Installed row status array, null when none.
    pub fn row_statuses_ptr(&self) -> *mut u16 {
        self.row_statuses.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    // ------------------------------------------------------------------
    // Query lifecycle
    // ------------------------------------------------------------------

    /// Prepare SQL text for execution. Any active query is closed first.
    ///
    /// Nothing is sent to the server until [`Statement::execute`].
    pub fn prepare(&mut self, sql: &str) -> SqlResult {
        self.api_call(|stmt| {
            stmt.prepare_internal(sql);
            Ok(SqlResult::Success)
        })
    }

    /// Prepare and execute SQL text in one call.
    pub fn execute_direct(&mut self, sql: &str) -> SqlResult {
        self.api_call(|stmt| {
            stmt.prepare_internal(sql);
            stmt.execute_internal()
        })
    }

    /// Execute the prepared query.
    ///
    /// # Errors
    ///
    /// Reports a sequence error (HY010) unless the statement is in the
    /// `Prepared` state. An executed query must be closed or prepared again.
    pub fn execute(&mut self) -> SqlResult {
        self.api_call(Self::execute_internal)
    }

    /// List the columns of tables in a cache (`SQLColumns`).
    ///
    /// An empty `schema` searches the connection's default cache.
    pub fn execute_columns_meta_query(
        &mut self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> SqlResult {
        self.api_call(|stmt| {
            let cache = stmt.schema_or_default(schema);
            let query = ColumnMetadataQuery::new(
                stmt.connection,
                cache,
                table.to_string(),
                column.to_string(),
            );
            stmt.start_query(Box::new(query))
        })
    }

    /// List tables (`SQLTables`).
    ///
    /// An empty `schema` searches the connection's default cache.
    pub fn execute_tables_meta_query(
        &mut self,
        catalog: &str,
        schema: &str,
        table: &str,
        table_type: &str,
    ) -> SqlResult {
        self.api_call(|stmt| {
            let cache = stmt.schema_or_default(schema);
            let query = TableMetadataQuery::new(
                stmt.connection,
                catalog.to_string(),
                cache,
                table.to_string(),
                table_type.to_string(),
            );
            stmt.start_query(Box::new(query))
        })
    }

    /// List foreign keys between two tables (`SQLForeignKeys`).
    pub fn execute_foreign_keys_query(
        &mut self,
        primary_catalog: &str,
        primary_schema: &str,
        primary_table: &str,
        foreign_catalog: &str,
        foreign_schema: &str,
        foreign_table: &str,
    ) -> SqlResult {
        self.api_call(|stmt| {
            let query = ForeignKeysQuery::new(
                KeyTable::new(primary_catalog, primary_schema, primary_table),
                KeyTable::new(foreign_catalog, foreign_schema, foreign_table),
            );
            stmt.start_query(Box::new(query))
        })
    }

    /// List the primary key columns of a table (`SQLPrimaryKeys`).
    pub fn execute_primary_keys_query(
        &mut self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SqlResult {
        self.api_call(|stmt| {
            let query = PrimaryKeysQuery::new(
                catalog.to_string(),
                schema.to_string(),
                table.to_string(),
            );
            stmt.start_query(Box::new(query))
        })
    }

    /// Close the cursor of the active query (`SQLCloseCursor`).
    ///
    /// If the query fails to close it stays active, so the call can be
    /// retried.
    pub fn close(&mut self) -> SqlResult {
        self.api_call(Self::close_internal)
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Fetch the next row into the bound column buffers.
    ///
    /// The rows-fetched counter is zeroed before anything else happens and
    /// set to 1 once a row was written.
    ///
    /// # Returns
    ///
    /// * `Success` - a row was written
    /// * `SuccessWithInfo` - a row was written, some value truncated (01004)
    /// * `NoData` - no rows left
    /// * `Error` - see diagnostics
    pub fn fetch_row(&mut self) -> SqlResult {
        self.api_call(Self::fetch_row_internal)
    }

    /// Column metadata of the active query, `None` without one.
    pub fn meta(&self) -> Option<&ColumnMetaVector> {
        self.current_query.as_ref().map(|query| query.meta())
    }

    /// Whether the active query has rows left.
    pub fn data_available(&self) -> bool {
        self.current_query
            .as_ref()
            .is_some_and(|query| query.data_available())
    }

    /// Number of result columns (`SQLNumResultCols`).
    ///
    /// Returns `None` and reports a sequence error without an active query.
    pub fn column_number(&mut self) -> Option<usize> {
        self.api_call_value(|stmt| {
            stmt.meta()
                .map(Vec::len)
                .ok_or_else(|| StatementError::sequence("Query is not executed."))
        })
    }

    /// Rows changed by the last executed query (`SQLRowCount`).
    ///
    /// Returns `None` and reports a sequence error without an active query.
    pub fn affected_rows(&mut self) -> Option<i64> {
        self.api_call_value(|stmt| {
            stmt.current_query
                .as_ref()
                .map(|query| query.affected_rows())
                .ok_or_else(|| StatementError::sequence("Query is not executed."))
        })
    }

    /// Read one descriptor attribute of a result column (`SQLColAttribute`).
    ///
    /// The numeric form is tried first when `numeric` is supplied, then the
    /// textual form. Text is copied NUL-terminated into `text`, and
    /// `text_len` receives the length of the full value even when it did not
    /// fit, in which case 01004 is reported with `SuccessWithInfo`.
    ///
    /// # Arguments
    ///
    /// * `column_idx` - 1-based column number
    /// * `attr_id` - `SQL_DESC_*` field identifier
    /// * `text` - Destination for textual attributes
    /// * `text_len` - Receives the textual attribute length
    /// * `numeric` - Destination for numeric attributes
    pub fn column_attribute(
        &mut self,
        column_idx: u16,
        attr_id: u16,
        text: Option<&mut [u8]>,
        text_len: Option<&mut i16>,
        numeric: Option<&mut i64>,
    ) -> SqlResult {
        self.api_call(|stmt| {
            stmt.column_attribute_internal(column_idx, attr_id, text, text_len, numeric)
        })
    }

    // ------------------------------------------------------------------
    // Internal operations
    // ------------------------------------------------------------------

    /// Reset diagnostics, run `op` and record its outcome.
    fn api_call<F>(&mut self, op: F) -> SqlResult
    where
        F: FnOnce(&mut Self) -> Result<SqlResult, StatementError>,
    {
        self.diagnostics.reset();

        let result = match op(self) {
            Ok(result) => result,
            Err(err) => {
                log::debug!("Statement call failed [{}]: {}", err.sql_state(), err);
                self.diagnostics.add_error(&err);
                SqlResult::Error
            }
        };

        self.diagnostics.set_header_record(result);
        result
    }

    /// Same as [`Statement::api_call`] for calls producing a value.
    fn api_call_value<T, F>(&mut self, op: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> Result<T, StatementError>,
    {
        let mut value = None;
        self.api_call(|stmt| {
            value = Some(op(stmt)?);
            Ok(SqlResult::Success)
        });
        value
    }

    fn schema_or_default(&self, schema: &str) -> String {
        if schema.is_empty() {
            self.connection.default_cache().to_string()
        } else {
            schema.to_string()
        }
    }

    /// Close and drop the active query. Close failures are only logged.
    fn close_current_query(&mut self) {
        if let Some(mut query) = self.current_query.take() {
            if let Err(err) = query.close() {
                log::warn!("Failed to close the previous query: {}", err);
            }
        }
        self.state = StatementState::Idle;
    }

    fn prepare_internal(&mut self, sql: &str) {
        self.close_current_query();

        let query = DataQuery::new(
            self.connection,
            sql.to_string(),
            Rc::clone(&self.param_bindings),
        );
        self.current_query = Some(Box::new(query));
        self.state = StatementState::Prepared;
    }

    fn execute_internal(&mut self) -> Result<SqlResult, StatementError> {
        let query = match (self.state, self.current_query.as_mut()) {
            (StatementState::Prepared, Some(query)) => query,
            _ => return Err(StatementError::sequence("Query is not prepared.")),
        };

        let result = query.execute()?;
        self.diagnostics.set_row_count(query.affected_rows());
        self.state = StatementState::Open;

        Ok(result)
    }

    /// Replace the active query with `query` and execute it.
    fn start_query(&mut self, query: Box<dyn Query + 'c>) -> Result<SqlResult, StatementError> {
        self.close_current_query();

        let query = self.current_query.insert(query);
        self.state = StatementState::Prepared;

        let result = query.execute()?;
        self.state = StatementState::Open;

        Ok(result)
    }

    fn close_internal(&mut self) -> Result<SqlResult, StatementError> {
        let query = self
            .current_query
            .as_mut()
            .ok_or_else(|| StatementError::invalid_cursor("Cursor is not in the open state."))?;

        let result = query.close()?;

        self.current_query = None;
        self.state = StatementState::Idle;
        log::debug!("Statement cursor closed");

        Ok(result)
    }

    fn fetch_row_internal(&mut self) -> Result<SqlResult, StatementError> {
        self.write_rows_fetched(0);

        let query = self
            .current_query
            .as_mut()
            .ok_or_else(|| StatementError::invalid_cursor("Cursor is not in the open state."))?;

        let Some(outcome) = query.fetch_next_row(&self.column_bindings)? else {
            log::trace!("Fetch reached the end of the result set");
            return Ok(SqlResult::NoData);
        };

        self.write_rows_fetched(1);
        self.write_row_status(SQL_ROW_SUCCESS);

        for &column in &outcome.truncated {
            self.diagnostics.add_status_record(
                DiagnosticRecord::new(
                    SqlState::S01004DataTruncated,
                    "Buffer is too small for the column data.",
                )
                .with_position(ROW_NUMBER_UNKNOWN, i32::from(column)),
            );
        }

        Ok(outcome.sql_result())
    }

    fn column_attribute_internal(
        &mut self,
        column_idx: u16,
        attr_id: u16,
        text: Option<&mut [u8]>,
        text_len: Option<&mut i16>,
        numeric: Option<&mut i64>,
    ) -> Result<SqlResult, StatementError> {
        let meta = self
            .meta()
            .ok_or_else(|| StatementError::sequence("Query is not executed."))?;

        let column = usize::from(column_idx)
            .checked_sub(1)
            .and_then(|pos| meta.get(pos))
            .ok_or_else(|| StatementError::General {
                message: "Column index is out of range.".to_string(),
                column: Some(i32::from(column_idx)),
            })?;

        if let Some(numeric) = numeric {
            if let Some(value) = column.numeric_attribute(attr_id) {
                *numeric = value;
                return Ok(SqlResult::Success);
            }
        }

        let value = column
            .string_attribute(attr_id)
            .ok_or_else(|| StatementError::NotImplemented("Unknown attribute.".to_string()))?;

        if let Some(text_len) = text_len {
            *text_len = i16::try_from(value.len()).unwrap_or(i16::MAX);
        }

        let truncated = text.is_some_and(|text| copy_string_to_buffer(&value, text));
        if truncated {
            self.diagnostics.add_status_record(DiagnosticRecord::new(
                SqlState::S01004DataTruncated,
                "Buffer is too small for the column attribute.",
            ));
            return Ok(SqlResult::SuccessWithInfo);
        }

        Ok(SqlResult::Success)
    }

    fn write_rows_fetched(&self, rows: usize) {
        if let Some(ptr) = self.rows_fetched {
            // SAFETY: `set_rows_fetched_ptr` requires the pointer to stay writable.
            unsafe { ptr.as_ptr().write(rows) };
        }
    }

    fn write_row_status(&self, status: u16) {
        if let Some(ptr) = self.row_statuses {
            // SAFETY: `set_row_statuses_ptr` requires room for at least one status.
            unsafe { ptr.as_ptr().write(status) };
        }
    }
}

impl Diagnosable for Statement<'_> {
    fn diagnostic_records(&self) -> &DiagnosticRecordStorage {
        &self.diagnostics
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("state", &self.state)
            .field("columns_bound", &self.column_bindings.len())
            .field("parameters_bound", &self.param_bindings.borrow().len())
            .field("has_query", &self.current_query.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CDataType;
    use crate::connection::ConnectionParams;
    use crate::error::TransportError;
    use crate::transport::messages::{
        ColumnsMetaRequest, ColumnsMetaResponse, QueryCloseRequest, QueryExecuteRequest,
        QueryExecuteResponse, QueryFetchRequest, QueryFetchResponse, TablesMetaRequest,
        TablesMetaResponse,
    };
    use crate::transport::TransportProtocol;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    mock! {
        pub Transport {}

        #[async_trait]
        impl TransportProtocol for Transport {
            async fn execute_query(&mut self, request: &QueryExecuteRequest) -> Result<QueryExecuteResponse, TransportError>;
            async fn fetch_query(&mut self, request: &QueryFetchRequest) -> Result<QueryFetchResponse, TransportError>;
            async fn close_query(&mut self, request: &QueryCloseRequest) -> Result<(), TransportError>;
            async fn get_columns_meta(&mut self, request: &ColumnsMetaRequest) -> Result<ColumnsMetaResponse, TransportError>;
            async fn get_tables_meta(&mut self, request: &TablesMetaRequest) -> Result<TablesMetaResponse, TransportError>;
            fn is_connected(&self) -> bool;
        }
    }

    fn connection() -> Connection {
        Connection::new(
            Arc::new(Mutex::new(MockTransport::new())),
            ConnectionParams::default(),
        )
    }

    fn char_buffer(data: &mut [u8], len: &mut isize) -> ApplicationDataBuffer {
        unsafe {
            ApplicationDataBuffer::new(
                CDataType::Char,
                data.as_mut_ptr().cast(),
                data.len() as isize,
                len,
            )
        }
    }

    fn first_state(stmt: &Statement<'_>) -> SqlState {
        stmt.diagnostic_records().status_record(1).unwrap().sql_state
    }

    #[test]
    fn test_new_statement_is_idle() {
        let conn = connection();
        let stmt = conn.create_statement();

        assert_eq!(stmt.state(), StatementState::Idle);
        assert!(stmt.meta().is_none());
        assert!(!stmt.data_available());
        assert_eq!(stmt.parameters_number(), 0);
        assert!(stmt.rows_fetched_ptr().is_null());
        assert!(stmt.row_statuses_ptr().is_null());
    }

    #[test]
    fn test_bind_column_zero_is_rejected() {
        let conn = connection();
        let mut stmt = conn.create_statement();
        let mut data = [0u8; 8];
        let mut len = 0isize;

        let result = stmt.bind_column(0, char_buffer(&mut data, &mut len));

        assert_eq!(result, SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::Hy000GeneralError);
        let record = stmt.diagnostic_records().status_record(1).unwrap();
        assert_eq!(record.column_number, 0);
        assert!(stmt.column_bindings().is_empty());
    }

    #[test]
    fn test_successful_call_resets_diagnostics() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        assert_eq!(stmt.execute(), SqlResult::Error);
        assert_eq!(stmt.diagnostic_records().status_records_number(), 1);

        assert_eq!(stmt.unbind_all_columns(), SqlResult::Success);
        assert_eq!(stmt.diagnostic_records().status_records_number(), 0);
        assert_eq!(
            stmt.diagnostic_records().header_result(),
            SqlResult::Success
        );
    }

    #[test]
    fn test_execute_without_prepare_is_sequence_error() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        assert_eq!(stmt.execute(), SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::Hy010SequenceError);
        assert_eq!(
            stmt.diagnostic_records().status_record(1).unwrap().message,
            "Query is not prepared."
        );
    }

    #[test]
    fn test_prepare_does_not_contact_server() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        assert_eq!(stmt.prepare("SELECT 1"), SqlResult::Success);
        assert_eq!(stmt.state(), StatementState::Prepared);
        assert_eq!(stmt.column_number(), Some(0));
        assert!(!stmt.data_available());
    }

    #[test]
    fn test_calls_without_query() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        assert_eq!(stmt.close(), SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::S24000InvalidCursorState);

        assert_eq!(stmt.fetch_row(), SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::S24000InvalidCursorState);

        assert_eq!(stmt.column_number(), None);
        assert_eq!(first_state(&stmt), SqlState::Hy010SequenceError);

        assert_eq!(stmt.affected_rows(), None);
        assert_eq!(first_state(&stmt), SqlState::Hy010SequenceError);

        assert_eq!(stmt.column_attribute(1, 11, None, None, None), SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::Hy010SequenceError);
    }

    #[test]
    fn test_fetch_without_query_zeroes_counter() {
        let conn = connection();
        let mut stmt = conn.create_statement();
        let mut fetched: usize = 7;

        unsafe { stmt.set_rows_fetched_ptr(&mut fetched) };
        assert_eq!(stmt.fetch_row(), SqlResult::Error);
        assert_eq!(fetched, 0);
    }

    #[test]
    fn test_primary_keys_row() {
        let conn = connection();
        let mut stmt = conn.create_statement();
        let mut column = [0u8; 16];
        let mut column_len = 0isize;

        assert_eq!(stmt.bind_column(4, char_buffer(&mut column, &mut column_len)), SqlResult::Success);
        assert_eq!(
            stmt.execute_primary_keys_query("", "PUBLIC", "PERSON"),
            SqlResult::Success
        );
        assert_eq!(stmt.state(), StatementState::Open);
        assert_eq!(stmt.column_number(), Some(6));

        assert_eq!(stmt.fetch_row(), SqlResult::Success);
        assert_eq!(&column[..5], b"_KEY\0");
        assert_eq!(column_len, 4);

        assert_eq!(stmt.fetch_row(), SqlResult::NoData);
        assert_eq!(stmt.close(), SqlResult::Success);
        assert_eq!(stmt.state(), StatementState::Idle);
    }

    #[test]
    fn test_execute_on_open_metadata_query_is_sequence_error() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        stmt.execute_primary_keys_query("", "PUBLIC", "PERSON");
        assert_eq!(stmt.execute(), SqlResult::Error);
        assert_eq!(first_state(&stmt), SqlState::Hy010SequenceError);

        // The open cursor is untouched
        assert_eq!(stmt.state(), StatementState::Open);
        assert!(stmt.data_available());
    }

    #[test]
    fn test_foreign_keys_result_is_empty() {
        let conn = connection();
        let mut stmt = conn.create_statement();

        assert_eq!(
            stmt.execute_foreign_keys_query("", "PUBLIC", "A", "", "PUBLIC", "B"),
            SqlResult::Success
        );
        assert_eq!(stmt.column_number(), Some(14));
        assert_eq!(stmt.affected_rows(), Some(0));
        assert!(!stmt.data_available());
        assert_eq!(stmt.fetch_row(), SqlResult::NoData);
    }

    #[test]
    fn test_column_attribute_of_metadata_layout() {
        let conn = connection();
        let mut stmt = conn.create_statement();
        stmt.execute_primary_keys_query("", "PUBLIC", "PERSON");

        let mut name = [0u8; 32];
        let mut name_len = 0i16;
        // SQL_DESC_NAME
        let result = stmt.column_attribute(5, 1011, Some(&mut name), Some(&mut name_len), None);
        assert_eq!(result, SqlResult::Success);
        assert_eq!(&name[..8], b"KEY_SEQ\0");
        assert_eq!(name_len, 7);

        let mut numeric = 0i64;
        // SQL_DESC_TYPE
        let result = stmt.column_attribute(5, 1002, None, None, Some(&mut numeric));
        assert_eq!(result, SqlResult::Success);
        assert_eq!(numeric, 5);

        // Unknown identifier
        assert_eq!(
            stmt.column_attribute(1, 9999, None, None, Some(&mut numeric)),
            SqlResult::Error
        );
        assert_eq!(
            first_state(&stmt),
            SqlState::Hyc00OptionalFeatureNotImplemented
        );
    }
}

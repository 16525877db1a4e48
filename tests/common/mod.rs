//! Common test utilities for ignite-odbc-rs integration tests.
//!
//! The statement layer is tested against a mocked transport: every test
//! states exactly which requests the server side is expected to see.
//!
//! Tests are plain `#[test]` functions. The connection drives the transport
//! on its own runtime and must not be called from inside another one.

#![allow(dead_code)]

use async_trait::async_trait;
use ignite_odbc::app::{ApplicationDataBuffer, CDataType, Parameter};
use ignite_odbc::connection::{Connection, ConnectionParams};
use ignite_odbc::diagnostic::{Diagnosable, DiagnosticRecord};
use ignite_odbc::error::TransportError;
use ignite_odbc::meta::ColumnMeta;
use ignite_odbc::statement::Statement;
use ignite_odbc::transport::{
    ColumnsMetaRequest, ColumnsMetaResponse, QueryCloseRequest, QueryExecuteRequest,
    QueryExecuteResponse, QueryFetchRequest, QueryFetchResponse, TablesMetaRequest,
    TablesMetaResponse, TransportProtocol,
};
use ignite_odbc::types::SqlType;
use mockall::mock;
use serde_json::Value;
use std::ffi::c_void;
use std::ptr;
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================================
// Mock Transport
// ============================================================================

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

// ============================================================================
// Connection Fixtures
// ============================================================================

/// Default cache used by test connections.
pub const TEST_CACHE: &str = "Person";

/// Connection parameters pointing at the test cache.
pub fn test_params() -> ConnectionParams {
    ConnectionParams::builder()
        .host("localhost")
        .cache(TEST_CACHE)
        .page_size(2)
        .build()
        .expect("valid test parameters")
}

/// Route `log` output through the test harness (`RUST_LOG=debug` to see it).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrap a configured mock into a connection.
pub fn connection_with(transport: MockTransport) -> Connection {
    init_logging();
    Connection::new(Arc::new(Mutex::new(transport)), test_params())
}

/// Connection whose transport must not be called.
pub fn idle_connection() -> Connection {
    connection_with(MockTransport::new())
}

// ============================================================================
// Server Data Fixtures
// ============================================================================

/// Result columns of `SELECT name, age FROM Person`.
pub fn person_columns() -> Vec<ColumnMeta> {
    let mut name = ColumnMeta::new("PUBLIC", "PERSON", "NAME", SqlType::Varchar);
    name.nullable = Some(true);

    let mut age = ColumnMeta::new("PUBLIC", "PERSON", "AGE", SqlType::Integer);
    age.nullable = Some(false);

    vec![name, age]
}

/// Response opening cursor `query_id` over [`person_columns`].
pub fn person_execute_response(query_id: i64) -> QueryExecuteResponse {
    QueryExecuteResponse {
        query_id,
        columns: person_columns(),
        affected_rows: 0,
    }
}

/// One page of rows.
pub fn page(rows: Vec<Vec<Value>>, last: bool) -> QueryFetchResponse {
    QueryFetchResponse { rows, last }
}

// ============================================================================
// Buffer Helpers
// ============================================================================

/// Character buffer over `data`, length indicator in `len`.
pub fn char_buffer(data: &mut [u8], len: &mut isize) -> ApplicationDataBuffer {
    unsafe {
        ApplicationDataBuffer::new(
            CDataType::Char,
            data.as_mut_ptr().cast::<c_void>(),
            data.len() as isize,
            len,
        )
    }
}

/// 32-bit integer buffer.
pub fn long_buffer(value: *mut i32, len: *mut isize) -> ApplicationDataBuffer {
    unsafe { ApplicationDataBuffer::new(CDataType::Long, value.cast(), 4, len) }
}

/// 32-bit integer input parameter without a length indicator.
pub fn long_parameter(value: *mut i32) -> Parameter {
    let buffer =
        unsafe { ApplicationDataBuffer::new(CDataType::Long, value.cast(), 4, ptr::null_mut()) };
    // SQL_INTEGER
    Parameter::new(buffer, 4, 10, 0)
}

// ============================================================================
// Diagnostics Helpers
// ============================================================================

/// First status record of the last call.
pub fn first_record<'a>(stmt: &'a Statement<'_>) -> &'a DiagnosticRecord {
    stmt.diagnostic_records()
        .status_record(1)
        .expect("a status record")
}

//! Connection to the server.
//!
//! A [`Connection`] owns the transport and the connection parameters, and is
//! the only place statements come from. The transport is asynchronous; the
//! connection drives it to completion on a process-wide runtime so that the
//! statement layer stays synchronous, as ODBC calls are.
//!
//! # Example
//!
//! ```no_run
//! # use ignite_odbc::connection::{Connection, ConnectionParams};
//! # use ignite_odbc::transport::TransportProtocol;
//! # use std::str::FromStr;
//! # use std::sync::Arc;
//! # use tokio::sync::Mutex;
//! # fn example(transport: Arc<Mutex<dyn TransportProtocol>>) -> Result<(), Box<dyn std::error::Error>> {
//! let params = ConnectionParams::from_str("ADDRESS=127.0.0.1:10800;CACHE=Person")?;
//! let connection = Connection::new(transport, params);
//!
//! let mut stmt = connection.create_statement();
//! stmt.execute_direct("SELECT name FROM Person");
//! # Ok(())
//! # }
//! ```

pub mod params;

pub use params::{ConnectionBuilder, ConnectionParams};

use crate::error::{StatementError, TransportError};
use crate::statement::Statement;
use crate::transport::{
    ColumnsMetaRequest, ColumnsMetaResponse, QueryCloseRequest, QueryExecuteRequest,
    QueryExecuteResponse, QueryFetchRequest, QueryFetchResponse, TablesMetaRequest,
    TablesMetaResponse, TransportProtocol,
};
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::runtime::Runtime;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Global tokio runtime for async-to-sync bridging.
/// This is lazily initialized on first use.
fn get_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime for the ODBC statement layer")
    })
}

/// Connection to a server node.
pub struct Connection {
    transport: Arc<Mutex<dyn TransportProtocol>>,
    params: ConnectionParams,
}

impl Connection {
    /// Create a connection over an established transport.
    pub fn new(transport: Arc<Mutex<dyn TransportProtocol>>, params: ConnectionParams) -> Self {
        Self { transport, params }
    }

    /// Connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Cache used when a metadata request names no schema.
    pub fn default_cache(&self) -> &str {
        &self.params.cache
    }

    /// Rows requested per fetch round trip.
    pub fn page_size(&self) -> i32 {
        self.params.page_size
    }

    /// Check if the transport is connected.
    ///
    /// Must not be called from inside an async context.
    pub fn is_connected(&self) -> bool {
        let transport = Arc::clone(&self.transport);
        get_runtime().block_on(async move { transport.lock().await.is_connected() })
    }

    /// Create a statement bound to this connection.
    pub fn create_statement(&self) -> Statement<'_> {
        Statement::new(self)
    }

    /// Run one transport round trip to completion, bounded by the query timeout.
    fn block_on<T, F>(&self, request: F) -> Result<T, StatementError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let runtime = get_runtime();

        match self.params.query_timeout {
            Some(limit) => runtime
                .block_on(async { timeout(limit, request).await })
                .map_err(|_| StatementError::Timeout {
                    timeout_ms: limit.as_millis() as u64,
                })?
                .map_err(StatementError::from),
            None => runtime.block_on(request).map_err(StatementError::from),
        }
    }

    pub(crate) fn execute_query(
        &self,
        request: &QueryExecuteRequest,
    ) -> Result<QueryExecuteResponse, StatementError> {
        log::debug!("Executing query: {}", request.sql);
        let transport = Arc::clone(&self.transport);
        self.block_on(async move { transport.lock().await.execute_query(request).await })
    }

    pub(crate) fn fetch_query(
        &self,
        request: &QueryFetchRequest,
    ) -> Result<QueryFetchResponse, StatementError> {
        log::trace!("Fetching page of query {}", request.query_id);
        let transport = Arc::clone(&self.transport);
        self.block_on(async move { transport.lock().await.fetch_query(request).await })
    }

    pub(crate) fn close_query(&self, request: &QueryCloseRequest) -> Result<(), StatementError> {
        log::debug!("Closing query {}", request.query_id);
        let transport = Arc::clone(&self.transport);
        self.block_on(async move { transport.lock().await.close_query(request).await })
    }

    pub(crate) fn get_columns_meta(
        &self,
        request: &ColumnsMetaRequest,
    ) -> Result<ColumnsMetaResponse, StatementError> {
        let transport = Arc::clone(&self.transport);
        self.block_on(async move { transport.lock().await.get_columns_meta(request).await })
    }

    pub(crate) fn get_tables_meta(
        &self,
        request: &TablesMetaRequest,
    ) -> Result<TablesMetaResponse, StatementError> {
        let transport = Arc::clone(&self.transport);
        self.block_on(async move { transport.lock().await.get_tables_meta(request).await })
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("params", &self.params)
            .field("transport", &"<TransportProtocol>")
            .finish()
    }
}

//! Transport protocol abstraction trait.
//!
//! This module defines the `TransportProtocol` trait the query executors use
//! to reach the server. Wire encoding and socket handling live behind it.

use crate::error::TransportError;
use async_trait::async_trait;

use super::messages::{
    ColumnsMetaRequest, ColumnsMetaResponse, QueryCloseRequest, QueryExecuteRequest,
    QueryExecuteResponse, QueryFetchRequest, QueryFetchResponse, TablesMetaRequest,
    TablesMetaResponse,
};

/// Transport protocol trait for server communication.
///
/// Implementations are driven from the statement layer through a blocking
/// bridge, so every call runs to completion before the statement continues.
#[async_trait]
pub trait TransportProtocol: Send + Sync {
    /// Execute a SQL query and open a cursor over its results.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails or the server rejects it.
    async fn execute_query(
        &mut self,
        request: &QueryExecuteRequest,
    ) -> Result<QueryExecuteResponse, TransportError>;

    /// Fetch the next page of an open cursor.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails or the cursor is unknown.
    async fn fetch_query(
        &mut self,
        request: &QueryFetchRequest,
    ) -> Result<QueryFetchResponse, TransportError>;

    /// Close an open cursor.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    async fn close_query(&mut self, request: &QueryCloseRequest) -> Result<(), TransportError>;

    /// List column metadata.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    async fn get_columns_meta(
        &mut self,
        request: &ColumnsMetaRequest,
    ) -> Result<ColumnsMetaResponse, TransportError>;

    /// List table metadata.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    async fn get_tables_meta(
        &mut self,
        request: &TablesMetaRequest,
    ) -> Result<TablesMetaResponse, TransportError>;

    /// Check if the transport is connected.
    fn is_connected(&self) -> bool;
}

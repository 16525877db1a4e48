//! Transport layer for server communication.
//!
//! This module provides the transport protocol abstraction the query
//! executors talk through, and the messages it carries.
//!
//! # Architecture
//!
//! The transport layer is organized into:
//! - `protocol` - Transport protocol trait definition
//! - `messages` - Protocol message types

pub mod messages;
pub mod protocol;

// Re-export commonly used types
pub use messages::{
    ColumnsMetaRequest, ColumnsMetaResponse, QueryCloseRequest, QueryExecuteRequest,
    QueryExecuteResponse, QueryFetchRequest, QueryFetchResponse, QueryId, TablesMetaRequest,
    TablesMetaResponse,
};
pub use protocol::TransportProtocol;

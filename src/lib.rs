//! # ignite-odbc-rs
//!
//! Statement layer of an ODBC driver for a distributed SQL cache.
//!
//! The crate implements the ODBC statement handle: binding tables for input
//! parameters and output columns, the prepare/execute/fetch/close lifecycle,
//! dispatch to one of five query executors (row data, column metadata, table
//! metadata, foreign keys, primary keys) and the result-plus-diagnostics
//! contract every ODBC call reports through. The executors reach the server
//! through the [`transport::TransportProtocol`] trait.
//!
//! ## Example
//!
//! ```no_run
//! # use ignite_odbc::*;
//! # use ignite_odbc::transport::TransportProtocol;
//! # use std::str::FromStr;
//! # use std::sync::Arc;
//! # use tokio::sync::Mutex;
//! # fn example(transport: Arc<Mutex<dyn TransportProtocol>>) -> Result<(), Box<dyn std::error::Error>> {
//! let params = ConnectionParams::from_str("ADDRESS=localhost:10800;CACHE=Person")?;
//! let connection = Connection::new(transport, params);
//!
//! let mut stmt = connection.create_statement();
//! if stmt.execute_tables_meta_query("", "", "%", "TABLE") == SqlResult::Error {
//!     for record in stmt.diagnostic_records().records() {
//!         eprintln!("[{}] {}", record.sql_state, record.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod app;
pub mod connection;
pub mod diagnostic;
pub mod error;
pub mod meta;
pub mod query;
pub mod statement;
pub mod transport;
pub mod types;
pub mod utility;

// Re-export public API
pub use app::{ApplicationDataBuffer, CDataType, Parameter};
pub use connection::{Connection, ConnectionBuilder, ConnectionParams};
pub use diagnostic::{Diagnosable, DiagnosticRecord, DiagnosticRecordStorage};
pub use error::{ConnectionError, DriverError, SqlResult, SqlState, StatementError, TransportError};
pub use statement::{Statement, StatementState};
pub use types::{SqlType, TypeMapper};

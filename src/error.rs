//! Error types for ignite-odbc-rs.
//!
//! This module defines domain-specific error types organized by functional area,
//! and the ODBC return codes and SQLSTATE values they are reported with.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Connection configuration errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Statement and query execution errors
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Transport protocol errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors related to connection configuration.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),
}

/// Errors raised by the statement layer and the query executors.
///
/// Every variant maps onto exactly one [`SqlState`], which is what ends up in
/// the diagnostic status record of the failed call.
#[derive(Error, Debug)]
pub enum StatementError {
    /// Operation invoked in a state that forbids it
    #[error("{0}")]
    Sequence(String),

    /// Close or fetch without an open cursor
    #[error("{0}")]
    InvalidCursorState(String),

    /// General error, optionally tied to a column
    #[error("{message}")]
    General {
        message: String,
        column: Option<i32>,
    },

    /// Unsupported feature or unknown attribute
    #[error("{0}")]
    NotImplemented(String),

    /// Bound buffer cannot hold the value type
    #[error("Restricted data type attribute violation for column {column}: {message}")]
    RestrictedDataType { column: i32, message: String },

    /// NULL fetched into a column bound without a length indicator
    #[error("Indicator variable required but not supplied for column {column}")]
    IndicatorRequired { column: i32 },

    /// Query execution timed out
    #[error("Query timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Remote side failed or the link broke
    #[error("Communication failure: {0}")]
    Communication(#[from] TransportError),
}

impl StatementError {
    /// Shorthand for a sequence error.
    pub fn sequence(message: impl Into<String>) -> Self {
        StatementError::Sequence(message.into())
    }

    /// Shorthand for an invalid cursor state error.
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        StatementError::InvalidCursorState(message.into())
    }

    /// Shorthand for a general error without column context.
    pub fn general(message: impl Into<String>) -> Self {
        StatementError::General {
            message: message.into(),
            column: None,
        }
    }

    /// Map to the SQLSTATE reported in diagnostics.
    pub fn sql_state(&self) -> SqlState {
        match self {
            StatementError::Sequence(_) => SqlState::Hy010SequenceError,
            StatementError::InvalidCursorState(_) => SqlState::S24000InvalidCursorState,
            StatementError::General { .. } => SqlState::Hy000GeneralError,
            StatementError::NotImplemented(_) => SqlState::Hyc00OptionalFeatureNotImplemented,
            StatementError::RestrictedDataType { .. } => SqlState::S07006RestrictedDataType,
            StatementError::IndicatorRequired { .. } => SqlState::S22002IndicatorRequired,
            StatementError::Timeout { .. } => SqlState::Hyt00Timeout,
            StatementError::Communication(_) => SqlState::S08S01CommunicationLinkFailure,
        }
    }

    /// Column number the error refers to, if any.
    pub fn column(&self) -> Option<i32> {
        match self {
            StatementError::General { column, .. } => *column,
            StatementError::RestrictedDataType { column, .. } => Some(*column),
            StatementError::IndicatorRequired { column } => Some(*column),
            _ => None,
        }
    }
}

/// Errors related to the transport protocol.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection to the remote node is not established
    #[error("Connection is closed")]
    ConnectionClosed,

    /// Message serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Server reported a failure for the request
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid response from server
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// Network I/O error
    #[error("Network I/O error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::IoError(err.to_string())
    }
}

/// ODBC return code of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlResult {
    /// SQL_SUCCESS
    Success,
    /// SQL_SUCCESS_WITH_INFO
    SuccessWithInfo,
    /// SQL_NO_DATA
    NoData,
    /// SQL_ERROR
    Error,
}

impl SqlResult {
    /// Whether the outcome counts as success (`SQL_SUCCEEDED`).
    pub fn is_success(self) -> bool {
        matches!(self, SqlResult::Success | SqlResult::SuccessWithInfo)
    }

    /// Numeric ODBC return code.
    pub fn code(self) -> i16 {
        match self {
            SqlResult::Success => 0,
            SqlResult::SuccessWithInfo => 1,
            SqlResult::NoData => 100,
            SqlResult::Error => -1,
        }
    }
}

/// SQLSTATE values reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlState {
    /// String data, right truncated
    S01004DataTruncated,
    /// Restricted data type attribute violation
    S07006RestrictedDataType,
    /// Communication link failure
    S08S01CommunicationLinkFailure,
    /// Indicator variable required but not supplied
    S22002IndicatorRequired,
    /// Invalid cursor state
    S24000InvalidCursorState,
    /// General error
    Hy000GeneralError,
    /// Function sequence error
    Hy010SequenceError,
    /// Optional feature not implemented
    Hyc00OptionalFeatureNotImplemented,
    /// Timeout expired
    Hyt00Timeout,
}

impl SqlState {
    /// Five-character SQLSTATE code.
    pub fn code(self) -> &'static str {
        match self {
            SqlState::S01004DataTruncated => "01004",
            SqlState::S07006RestrictedDataType => "07006",
            SqlState::S08S01CommunicationLinkFailure => "08S01",
            SqlState::S22002IndicatorRequired => "22002",
            SqlState::S24000InvalidCursorState => "24000",
            SqlState::Hy000GeneralError => "HY000",
            SqlState::Hy010SequenceError => "HY010",
            SqlState::Hyc00OptionalFeatureNotImplemented => "HYC00",
            SqlState::Hyt00Timeout => "HYT00",
        }
    }

    /// Class "01" states are warnings rather than errors.
    pub fn is_warning(self) -> bool {
        self.code().starts_with("01")
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = ConnectionError::InvalidParameter {
            parameter: "PAGE_SIZE".to_string(),
            message: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("PAGE_SIZE"));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_statement_error_sql_state_mapping() {
        assert_eq!(
            StatementError::sequence("Query is not prepared.").sql_state(),
            SqlState::Hy010SequenceError
        );
        assert_eq!(
            StatementError::invalid_cursor("Cursor is not in the open state.").sql_state(),
            SqlState::S24000InvalidCursorState
        );
        assert_eq!(
            StatementError::NotImplemented("Unknown attribute.".to_string()).sql_state(),
            SqlState::Hyc00OptionalFeatureNotImplemented
        );
        assert_eq!(
            StatementError::Timeout { timeout_ms: 10 }.sql_state(),
            SqlState::Hyt00Timeout
        );

        assert_eq!(
            StatementError::IndicatorRequired { column: 2 }.sql_state(),
            SqlState::S22002IndicatorRequired
        );

        let err: StatementError = TransportError::ConnectionClosed.into();
        assert_eq!(err.sql_state(), SqlState::S08S01CommunicationLinkFailure);
    }

    #[test]
    fn test_general_error_carries_column() {
        let err = StatementError::General {
            message: "Column index is out of range.".to_string(),
            column: Some(7),
        };
        assert_eq!(err.column(), Some(7));
        assert_eq!(err.to_string(), "Column index is out of range.");
        assert_eq!(StatementError::general("oops").column(), None);
    }

    #[test]
    fn test_sql_state_display() {
        assert_eq!(SqlState::Hy010SequenceError.to_string(), "HY010");
        assert_eq!(SqlState::S24000InvalidCursorState.to_string(), "24000");
        assert!(SqlState::S01004DataTruncated.is_warning());
        assert!(!SqlState::Hy000GeneralError.is_warning());
    }

    #[test]
    fn test_sql_result_codes() {
        assert!(SqlResult::Success.is_success());
        assert!(SqlResult::SuccessWithInfo.is_success());
        assert!(!SqlResult::NoData.is_success());
        assert!(!SqlResult::Error.is_success());
        assert_eq!(SqlResult::NoData.code(), 100);
        assert_eq!(SqlResult::Error.code(), -1);
    }

    #[test]
    fn test_transport_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TransportError = err.into();
        assert!(err.to_string().contains("Serialization error"));
    }
}

//! Request and response messages exchanged with the server.
//!
//! Cell values travel as JSON values; one row is a `Vec<Value>` in column
//! order.

use crate::meta::{ColumnMeta, TableMeta};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-side identifier of an open query cursor.
pub type QueryId = i64;

/// Execute a SQL query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExecuteRequest {
    /// Cache (schema) the query runs against
    pub cache: String,
    /// SQL text
    pub sql: String,
    /// Positional arguments, in parameter index order
    pub arguments: Vec<Value>,
}

/// Result of executing a SQL query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExecuteResponse {
    /// Cursor identifier for subsequent fetch/close requests
    pub query_id: QueryId,
    /// Result set columns
    pub columns: Vec<ColumnMeta>,
    /// Rows changed by a DML statement, zero for queries
    #[serde(default)]
    pub affected_rows: i64,
}

/// Fetch the next page of an open cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFetchRequest {
    /// Cursor to fetch from
    pub query_id: QueryId,
    /// Maximum number of rows in the page
    pub page_size: i32,
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFetchResponse {
    /// Rows of the page
    pub rows: Vec<Vec<Value>>,
    /// Whether this is the last page of the cursor
    pub last: bool,
}

/// Close an open cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCloseRequest {
    /// Cursor to close
    pub query_id: QueryId,
}

/// List columns matching the given names and patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsMetaRequest {
    /// Cache (schema) name
    pub cache: String,
    /// Table name pattern
    pub table: String,
    /// Column name pattern
    pub column: String,
}

/// Columns found by a [`ColumnsMetaRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsMetaResponse {
    /// Matching columns
    pub columns: Vec<ColumnMeta>,
}

/// List tables matching the given names and patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesMetaRequest {
    /// Catalog name
    pub catalog: String,
    /// Schema (cache) name pattern
    pub schema: String,
    /// Table name pattern
    pub table: String,
    /// Comma separated table types
    pub table_type: String,
}

/// Tables found by a [`TablesMetaRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesMetaResponse {
    /// Matching tables
    pub tables: Vec<TableMeta>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_request_wire_shape() {
        let request = QueryExecuteRequest {
            cache: "Person".to_string(),
            sql: "SELECT * FROM Person WHERE age > ?".to_string(),
            arguments: vec![json!(18)],
        };

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            json!({
                "cache": "Person",
                "sql": "SELECT * FROM Person WHERE age > ?",
                "arguments": [18]
            })
        );
    }

    #[test]
    fn test_execute_response_defaults_affected_rows() {
        let response: QueryExecuteResponse = serde_json::from_value(json!({
            "query_id": 7,
            "columns": [{
                "schema_name": "Person",
                "table_name": "PERSON",
                "column_name": "NAME",
                "data_type": "VARCHAR"
            }]
        }))
        .unwrap();

        assert_eq!(response.query_id, 7);
        assert_eq!(response.columns.len(), 1);
        assert_eq!(response.affected_rows, 0);
    }

    #[test]
    fn test_fetch_response() {
        let response: QueryFetchResponse = serde_json::from_value(json!({
            "rows": [[1, "a"], [2, null]],
            "last": true
        }))
        .unwrap();

        assert_eq!(response.rows.len(), 2);
        assert!(response.rows[1][1].is_null());
        assert!(response.last);
    }
}

//! Column and table metadata.

mod column;
mod table;

pub use column::{ColumnAttribute, ColumnMeta};
pub use table::TableMeta;

/// Ordered metadata of a result set's columns.
pub type ColumnMetaVector = Vec<ColumnMeta>;

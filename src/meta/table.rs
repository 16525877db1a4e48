//! Table metadata.

use serde::{Deserialize, Serialize};

/// One table as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Catalog name (empty when the server has no catalogs)
    #[serde(default)]
    pub catalog_name: String,
    /// Schema (cache) name
    pub schema_name: String,
    /// Table name
    pub table_name: String,
    /// Table type, e.g. `TABLE`
    pub table_type: String,
}

impl TableMeta {
    /// Create table metadata.
    pub fn new(
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        table_type: impl Into<String>,
    ) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            table_type: table_type.into(),
        }
    }
}

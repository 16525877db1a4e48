//! Column metadata and descriptor attribute resolution.

use crate::types::{SqlType, TypeMapper};
use serde::{Deserialize, Serialize};

/// `SQL_NULLABLE_UNKNOWN`
const NULLABLE_UNKNOWN: i64 = 2;
/// `SQL_PRED_BASIC`
const PRED_BASIC: i64 = 2;
/// `SQL_ATTR_READWRITE_UNKNOWN`
const READWRITE_UNKNOWN: i64 = 2;

/// ODBC column descriptor fields (`SQL_DESC_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAttribute {
    ConciseType,
    DisplaySize,
    Unsigned,
    FixedPrecScale,
    Updatable,
    AutoUniqueValue,
    CaseSensitive,
    Searchable,
    TypeName,
    TableName,
    SchemaName,
    CatalogName,
    Label,
    BaseColumnName,
    BaseTableName,
    LiteralPrefix,
    LiteralSuffix,
    LocalTypeName,
    NumPrecRadix,
    Type,
    Length,
    Precision,
    Scale,
    Nullable,
    Name,
    Unnamed,
    OctetLength,
}

impl ColumnAttribute {
    /// Map an ODBC field identifier.
    pub fn from_id(id: u16) -> Option<Self> {
        let attr = match id {
            2 => ColumnAttribute::ConciseType,
            6 => ColumnAttribute::DisplaySize,
            8 => ColumnAttribute::Unsigned,
            9 => ColumnAttribute::FixedPrecScale,
            10 => ColumnAttribute::Updatable,
            11 => ColumnAttribute::AutoUniqueValue,
            12 => ColumnAttribute::CaseSensitive,
            13 => ColumnAttribute::Searchable,
            14 => ColumnAttribute::TypeName,
            15 => ColumnAttribute::TableName,
            16 => ColumnAttribute::SchemaName,
            17 => ColumnAttribute::CatalogName,
            18 => ColumnAttribute::Label,
            22 => ColumnAttribute::BaseColumnName,
            23 => ColumnAttribute::BaseTableName,
            27 => ColumnAttribute::LiteralPrefix,
            28 => ColumnAttribute::LiteralSuffix,
            29 => ColumnAttribute::LocalTypeName,
            32 => ColumnAttribute::NumPrecRadix,
            1002 => ColumnAttribute::Type,
            1003 => ColumnAttribute::Length,
            1005 => ColumnAttribute::Precision,
            1006 => ColumnAttribute::Scale,
            1008 => ColumnAttribute::Nullable,
            1011 => ColumnAttribute::Name,
            1012 => ColumnAttribute::Unnamed,
            1013 => ColumnAttribute::OctetLength,
            _ => return None,
        };
        Some(attr)
    }
}

/// Metadata of one result set column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Schema (cache) the column belongs to
    pub schema_name: String,
    /// Table the column belongs to
    pub table_name: String,
    /// Column name
    pub column_name: String,
    /// Remote type of the column
    pub data_type: SqlType,
    /// Precision, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    /// Scale, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    /// Nullability, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl ColumnMeta {
    /// Create column metadata with unknown precision, scale and nullability.
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: SqlType,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type,
            precision: None,
            scale: None,
            nullable: None,
        }
    }

    /// Numeric value of attribute `id`, `None` if it has no numeric form.
    pub fn numeric_attribute(&self, id: u16) -> Option<i64> {
        let ty = self.data_type;
        let value = match ColumnAttribute::from_id(id)? {
            ColumnAttribute::FixedPrecScale | ColumnAttribute::AutoUniqueValue => 0,
            ColumnAttribute::CaseSensitive => i64::from(TypeMapper::is_case_sensitive(ty)),
            ColumnAttribute::ConciseType | ColumnAttribute::Type => {
                i64::from(TypeMapper::odbc_type(ty))
            }
            ColumnAttribute::DisplaySize => i64::from(TypeMapper::display_size(ty)),
            ColumnAttribute::Length => i64::from(TypeMapper::column_size(ty)),
            ColumnAttribute::OctetLength => i64::from(TypeMapper::octet_length(ty)),
            ColumnAttribute::Nullable => match self.nullable {
                Some(nullable) => i64::from(nullable),
                None => NULLABLE_UNKNOWN,
            },
            ColumnAttribute::NumPrecRadix => {
                i64::from(TypeMapper::num_prec_radix(ty).unwrap_or(0))
            }
            ColumnAttribute::Precision => i64::from(
                self.precision
                    .unwrap_or_else(|| TypeMapper::column_size(ty)),
            ),
            ColumnAttribute::Scale => i64::from(
                self.scale
                    .unwrap_or_else(|| i32::from(TypeMapper::decimal_digits(ty).unwrap_or(0))),
            ),
            ColumnAttribute::Searchable => PRED_BASIC,
            ColumnAttribute::Unnamed => i64::from(self.column_name.is_empty()),
            ColumnAttribute::Unsigned => i64::from(TypeMapper::is_unsigned(ty)),
            ColumnAttribute::Updatable => READWRITE_UNKNOWN,
            _ => return None,
        };
        Some(value)
    }

    /// Textual value of attribute `id`, `None` if it has no textual form.
    pub fn string_attribute(&self, id: u16) -> Option<String> {
        let value = match ColumnAttribute::from_id(id)? {
            ColumnAttribute::Label | ColumnAttribute::BaseColumnName | ColumnAttribute::Name => {
                self.column_name.clone()
            }
            ColumnAttribute::TableName | ColumnAttribute::BaseTableName => {
                self.table_name.clone()
            }
            ColumnAttribute::SchemaName => self.schema_name.clone(),
            ColumnAttribute::CatalogName => String::new(),
            ColumnAttribute::LiteralPrefix => TypeMapper::literal_quote(self.data_type)
                .unwrap_or_default()
                .to_string(),
            ColumnAttribute::LiteralSuffix => match TypeMapper::literal_quote(self.data_type) {
                Some("'") => "'".to_string(),
                _ => String::new(),
            },
            ColumnAttribute::TypeName | ColumnAttribute::LocalTypeName => {
                TypeMapper::type_name(self.data_type).to_string()
            }
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQL_DESC_NAME: u16 = 1011;
    const SQL_DESC_TYPE: u16 = 1002;
    const SQL_DESC_NULLABLE: u16 = 1008;

    fn name_column() -> ColumnMeta {
        ColumnMeta::new("PUBLIC", "PERSON", "NAME", SqlType::Varchar)
    }

    #[test]
    fn test_string_attributes() {
        let meta = name_column();
        assert_eq!(meta.string_attribute(SQL_DESC_NAME).as_deref(), Some("NAME"));
        assert_eq!(meta.string_attribute(15).as_deref(), Some("PERSON"));
        assert_eq!(meta.string_attribute(16).as_deref(), Some("PUBLIC"));
        assert_eq!(meta.string_attribute(17).as_deref(), Some(""));
        assert_eq!(meta.string_attribute(14).as_deref(), Some("VARCHAR"));
        assert_eq!(meta.string_attribute(27).as_deref(), Some("'"));
        assert_eq!(meta.string_attribute(SQL_DESC_TYPE), None);
    }

    #[test]
    fn test_numeric_attributes() {
        let meta = name_column();
        assert_eq!(meta.numeric_attribute(SQL_DESC_TYPE), Some(12));
        assert_eq!(meta.numeric_attribute(12), Some(1));
        assert_eq!(meta.numeric_attribute(SQL_DESC_NULLABLE), Some(NULLABLE_UNKNOWN));
        assert_eq!(meta.numeric_attribute(1012), Some(0));
        assert_eq!(meta.numeric_attribute(SQL_DESC_NAME), None);
    }

    #[test]
    fn test_precision_defaults_to_column_size() {
        let mut meta = ColumnMeta::new("PUBLIC", "PERSON", "AGE", SqlType::Integer);
        assert_eq!(meta.numeric_attribute(1005), Some(10));
        assert_eq!(meta.numeric_attribute(1006), Some(0));
        assert_eq!(meta.numeric_attribute(8), Some(0));

        meta.precision = Some(4);
        meta.nullable = Some(false);
        assert_eq!(meta.numeric_attribute(1005), Some(4));
        assert_eq!(meta.numeric_attribute(SQL_DESC_NULLABLE), Some(0));
    }

    #[test]
    fn test_unknown_attribute() {
        let meta = name_column();
        assert_eq!(ColumnAttribute::from_id(9999), None);
        assert_eq!(meta.numeric_attribute(9999), None);
        assert_eq!(meta.string_attribute(9999), None);
    }

    #[test]
    fn test_deserialize_from_server() {
        let meta: ColumnMeta = serde_json::from_str(
            r#"{"schema_name":"PUBLIC","table_name":"T","column_name":"ID","data_type":"BIGINT"}"#,
        )
        .unwrap();
        assert_eq!(meta.data_type, SqlType::BigInt);
        assert_eq!(meta.precision, None);
    }
}

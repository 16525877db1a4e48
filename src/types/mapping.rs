//! Type mapping between remote column types and ODBC SQL types.

use serde::{Deserialize, Serialize};

/// `SQL_NO_TOTAL`: length is variable or unknown.
pub const SQL_NO_TOTAL: i32 = -4;

/// Remote column type as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    /// Variable-length string
    Varchar,
    /// Boolean
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Arbitrary precision decimal
    Decimal,
    /// Variable-length binary
    Varbinary,
    /// UUID
    Uuid,
    /// Calendar date
    Date,
    /// Date and time
    Timestamp,
}

/// Maps remote types onto the ODBC type system.
pub struct TypeMapper;

impl TypeMapper {
    /// ODBC SQL type code (`SQL_DESC_TYPE` / `SQL_DESC_CONCISE_TYPE`).
    pub fn odbc_type(sql_type: SqlType) -> i16 {
        match sql_type {
            SqlType::Varchar => 12,
            SqlType::Boolean => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Double => 8,
            SqlType::Decimal => 3,
            SqlType::Varbinary => -3,
            SqlType::Uuid => -11,
            SqlType::Date => 91,
            SqlType::Timestamp => 93,
        }
    }

    /// Type name as shown to applications.
    pub fn type_name(sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Varchar => "VARCHAR",
            SqlType::Boolean => "BOOLEAN",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Decimal => "DECIMAL",
            SqlType::Varbinary => "VARBINARY",
            SqlType::Uuid => "UUID",
            SqlType::Date => "DATE",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }

    /// Column size (precision for numeric types, characters otherwise).
    pub fn column_size(sql_type: SqlType) -> i32 {
        match sql_type {
            SqlType::Boolean => 1,
            SqlType::TinyInt => 3,
            SqlType::SmallInt => 5,
            SqlType::Integer => 10,
            SqlType::BigInt => 19,
            SqlType::Float => 7,
            SqlType::Double => 15,
            SqlType::Uuid => 36,
            SqlType::Date => 10,
            SqlType::Timestamp => 19,
            SqlType::Varchar | SqlType::Decimal | SqlType::Varbinary => SQL_NO_TOTAL,
        }
    }

    /// Maximum number of characters needed to display a value.
    pub fn display_size(sql_type: SqlType) -> i32 {
        match sql_type {
            SqlType::Boolean => 1,
            SqlType::TinyInt => 4,
            SqlType::SmallInt => 6,
            SqlType::Integer => 11,
            SqlType::BigInt => 20,
            SqlType::Float => 13,
            SqlType::Double => 24,
            SqlType::Uuid => 36,
            SqlType::Date => 10,
            SqlType::Timestamp => 19,
            SqlType::Varchar | SqlType::Decimal | SqlType::Varbinary => SQL_NO_TOTAL,
        }
    }

    /// Length in bytes of the default C representation.
    pub fn octet_length(sql_type: SqlType) -> i32 {
        match sql_type {
            SqlType::Boolean | SqlType::TinyInt => 1,
            SqlType::SmallInt => 2,
            SqlType::Integer | SqlType::Float => 4,
            SqlType::BigInt | SqlType::Double => 8,
            SqlType::Uuid | SqlType::Timestamp => 16,
            SqlType::Date => 6,
            SqlType::Varchar | SqlType::Decimal | SqlType::Varbinary => SQL_NO_TOTAL,
        }
    }

    /// Decimal digits, when the type has a fixed scale.
    pub fn decimal_digits(sql_type: SqlType) -> Option<i16> {
        match sql_type {
            SqlType::Boolean
            | SqlType::TinyInt
            | SqlType::SmallInt
            | SqlType::Integer
            | SqlType::BigInt => Some(0),
            _ => None,
        }
    }

    /// Radix of `column_size`: 2 for approximate numerics, 10 for exact ones.
    pub fn num_prec_radix(sql_type: SqlType) -> Option<i16> {
        match sql_type {
            SqlType::Float | SqlType::Double => Some(2),
            SqlType::TinyInt
            | SqlType::SmallInt
            | SqlType::Integer
            | SqlType::BigInt
            | SqlType::Decimal => Some(10),
            _ => None,
        }
    }

    /// Whether the type is unsigned (non-numeric types count as unsigned).
    pub fn is_unsigned(sql_type: SqlType) -> bool {
        !matches!(
            sql_type,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Float
                | SqlType::Double
                | SqlType::Decimal
        )
    }

    /// Whether values of the type compare case sensitively.
    pub fn is_case_sensitive(sql_type: SqlType) -> bool {
        matches!(sql_type, SqlType::Varchar)
    }

    /// Quote used around literals of this type, if any.
    pub fn literal_quote(sql_type: SqlType) -> Option<&'static str> {
        match sql_type {
            SqlType::Varchar | SqlType::Uuid | SqlType::Date | SqlType::Timestamp => Some("'"),
            SqlType::Varbinary => Some("0x"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odbc_type_codes() {
        assert_eq!(TypeMapper::odbc_type(SqlType::Varchar), 12);
        assert_eq!(TypeMapper::odbc_type(SqlType::BigInt), -5);
        assert_eq!(TypeMapper::odbc_type(SqlType::Timestamp), 93);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(TypeMapper::column_size(SqlType::Integer), 10);
        assert_eq!(TypeMapper::display_size(SqlType::Integer), 11);
        assert_eq!(TypeMapper::octet_length(SqlType::Integer), 4);
        assert_eq!(TypeMapper::column_size(SqlType::Varchar), SQL_NO_TOTAL);
    }

    #[test]
    fn test_signedness_and_radix() {
        assert!(!TypeMapper::is_unsigned(SqlType::Integer));
        assert!(TypeMapper::is_unsigned(SqlType::Varchar));
        assert_eq!(TypeMapper::num_prec_radix(SqlType::Double), Some(2));
        assert_eq!(TypeMapper::num_prec_radix(SqlType::Decimal), Some(10));
        assert_eq!(TypeMapper::num_prec_radix(SqlType::Varchar), None);
    }

    #[test]
    fn test_serde_names() {
        let ty: SqlType = serde_json::from_str("\"BIGINT\"").unwrap();
        assert_eq!(ty, SqlType::BigInt);
        assert_eq!(serde_json::to_string(&SqlType::Varchar).unwrap(), "\"VARCHAR\"");
    }
}

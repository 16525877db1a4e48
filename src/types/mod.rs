//! Type mapping between remote and ODBC data types.

mod mapping;

pub use mapping::{SqlType, TypeMapper, SQL_NO_TOTAL};

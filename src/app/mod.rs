//! Application-side buffers and binding tables.
//!
//! Everything in this module describes memory the application owns. The
//! driver reads parameters from it at execute time and writes column values
//! into it at fetch time.

pub mod binding;
pub mod buffer;
pub mod parameter;

pub use binding::{Bindable, BindingTable, ColumnBindingMap, ParameterBindingMap};
pub use buffer::{
    ApplicationDataBuffer, BindOffset, CDataType, ConversionResult, SQL_NTS, SQL_NULL_DATA,
};
pub use parameter::Parameter;

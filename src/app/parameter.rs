//! Input parameter descriptors.

use super::buffer::{ApplicationDataBuffer, BindOffset};
use super::binding::Bindable;
use serde_json::Value;

/// A bound input parameter: the application buffer plus the SQL type the
/// application declared for it.
#[derive(Debug, Clone)]
pub struct Parameter {
    buffer: ApplicationDataBuffer,
    sql_type: i16,
    column_size: usize,
    dec_digits: i16,
}

impl Parameter {
    /// Create a parameter descriptor.
    pub fn new(
        buffer: ApplicationDataBuffer,
        sql_type: i16,
        column_size: usize,
        dec_digits: i16,
    ) -> Self {
        Self {
            buffer,
            sql_type,
            column_size,
            dec_digits,
        }
    }

    /// Underlying application buffer.
    pub fn buffer(&self) -> &ApplicationDataBuffer {
        &self.buffer
    }

    /// Declared ODBC SQL type.
    pub fn sql_type(&self) -> i16 {
        self.sql_type
    }

    /// Declared column size.
    pub fn column_size(&self) -> usize {
        self.column_size
    }

    /// Declared decimal digits.
    pub fn dec_digits(&self) -> i16 {
        self.dec_digits
    }

    /// Current value of the parameter, read from application memory now.
    pub fn value(&self) -> Value {
        self.buffer.get_value()
    }
}

impl Bindable for Parameter {
    fn link_offset(&mut self, offset: BindOffset) {
        self.buffer.link_offset(offset);
    }
}

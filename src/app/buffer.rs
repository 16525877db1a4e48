//! Application data buffers.
//!
//! An [`ApplicationDataBuffer`] describes memory owned by the calling
//! application: a data region, its capacity, and a length/indicator slot.
//! The buffer never owns or frees that memory. Every access goes through the
//! [`BindOffset`] cell of the binding table the buffer belongs to, so moving
//! the application's offset value shifts all bound buffers at once.

use serde_json::{Number, Value};
use std::cell::Cell;
use std::ffi::c_void;
use std::mem::size_of;
use std::ptr::{self, NonNull};
use std::rc::Rc;

/// Length indicator value marking a NULL.
pub const SQL_NULL_DATA: isize = -1;

/// Length indicator value marking a NUL-terminated string.
pub const SQL_NTS: isize = -3;

/// C data type of an application buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CDataType {
    /// SQL_C_CHAR
    Char,
    /// SQL_C_BINARY
    Binary,
    /// SQL_C_BIT
    Bit,
    /// SQL_C_STINYINT
    TinyInt,
    /// SQL_C_UTINYINT
    UTinyInt,
    /// SQL_C_SSHORT
    Short,
    /// SQL_C_USHORT
    UShort,
    /// SQL_C_SLONG
    Long,
    /// SQL_C_ULONG
    ULong,
    /// SQL_C_SBIGINT
    BigInt,
    /// SQL_C_UBIGINT
    UBigInt,
    /// SQL_C_FLOAT
    Float,
    /// SQL_C_DOUBLE
    Double,
    /// SQL_C_DEFAULT
    Default,
}

impl CDataType {
    /// Map an ODBC `SQL_C_*` code.
    pub fn from_odbc(code: i16) -> Option<Self> {
        let ty = match code {
            1 => CDataType::Char,
            -2 => CDataType::Binary,
            -7 => CDataType::Bit,
            -26 => CDataType::TinyInt,
            -28 => CDataType::UTinyInt,
            -15 => CDataType::Short,
            -17 => CDataType::UShort,
            -16 => CDataType::Long,
            -18 => CDataType::ULong,
            -25 => CDataType::BigInt,
            -27 => CDataType::UBigInt,
            7 => CDataType::Float,
            8 => CDataType::Double,
            99 => CDataType::Default,
            _ => return None,
        };
        Some(ty)
    }
}

/// Outcome of writing a value into an application buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionResult {
    /// Value written completely
    Success,
    /// Variable-length value did not fit and was truncated
    VarlenDataTruncated,
    /// Value cannot be represented in the buffer type
    Fail,
    /// NULL value for a buffer without a length indicator
    IndicatorRequired,
}

/// Shared bind offset cell of a binding table.
///
/// Holds the application's offset pointer (or nothing). Clones share the same
/// cell, so installing a new pointer is seen by every buffer linked to it.
#[derive(Debug, Clone, Default)]
pub struct BindOffset(Rc<Cell<Option<NonNull<usize>>>>);

impl BindOffset {
    /// Create an empty cell (offset 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the application's offset pointer. Null clears it.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must stay valid for reads for as long as it is
    /// installed and any linked buffer is accessed.
    pub unsafe fn set(&self, ptr: *mut usize) {
        self.0.set(NonNull::new(ptr));
    }

    /// Installed pointer, null when none.
    pub fn ptr(&self) -> *mut usize {
        self.0.get().map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Offset value at this moment.
    pub fn current(&self) -> usize {
        match self.0.get() {
            // SAFETY: `set` requires the pointer to stay readable while installed.
            Some(ptr) => unsafe { ptr.as_ptr().read() },
            None => 0,
        }
    }
}

/// Application-owned buffer bound to a column or parameter.
#[derive(Debug, Clone)]
pub struct ApplicationDataBuffer {
    target_type: CDataType,
    buffer: *mut c_void,
    buffer_len: isize,
    res_len: *mut isize,
    offset: BindOffset,
}

impl ApplicationDataBuffer {
    /// Describe an application buffer.
    ///
    /// # Safety
    ///
    /// `buffer` (when non-null) must be valid for reads and writes of
    /// `buffer_len` bytes and `res_len` (when non-null) for one `isize`, at
    /// every bind offset the application installs, for as long as the buffer
    /// stays bound.
    pub unsafe fn new(
        target_type: CDataType,
        buffer: *mut c_void,
        buffer_len: isize,
        res_len: *mut isize,
    ) -> Self {
        Self {
            target_type,
            buffer,
            buffer_len,
            res_len,
            offset: BindOffset::new(),
        }
    }

    /// Route address computation through `offset`.
    pub(crate) fn link_offset(&mut self, offset: BindOffset) {
        self.offset = offset;
    }

    /// C type of the buffer.
    pub fn target_type(&self) -> CDataType {
        self.target_type
    }

    /// Capacity of the data region in bytes.
    pub fn buffer_len(&self) -> isize {
        self.buffer_len
    }

    /// Effective data address: base plus the current bind offset.
    pub fn data_ptr(&self) -> *mut c_void {
        if self.buffer.is_null() {
            return ptr::null_mut();
        }
        self.buffer
            .cast::<u8>()
            .wrapping_add(self.offset.current())
            .cast()
    }

    /// Effective length/indicator address.
    pub fn res_len_ptr(&self) -> *mut isize {
        if self.res_len.is_null() {
            return ptr::null_mut();
        }
        self.res_len
            .cast::<u8>()
            .wrapping_add(self.offset.current())
            .cast()
    }

    fn write_res_len(&self, len: isize) {
        let res_len = self.res_len_ptr();
        if !res_len.is_null() {
            // SAFETY: validity at every installed offset is a precondition of `new`.
            unsafe { res_len.write_unaligned(len) };
        }
    }

    fn read_res_len(&self) -> Option<isize> {
        let res_len = self.res_len_ptr();
        if res_len.is_null() {
            None
        } else {
            // SAFETY: validity at every installed offset is a precondition of `new`.
            Some(unsafe { res_len.read_unaligned() })
        }
    }

    fn put_fixed<T: Copy>(&self, value: T) -> ConversionResult {
        let data = self.data_ptr();
        if !data.is_null() {
            // SAFETY: fixed-size targets are sized by their C type; validity is a
            // precondition of `new`.
            unsafe { data.cast::<T>().write_unaligned(value) };
        }
        self.write_res_len(size_of::<T>() as isize);
        ConversionResult::Success
    }

    fn put_bytes(&self, bytes: &[u8], nul_terminate: bool) -> ConversionResult {
        self.write_res_len(bytes.len() as isize);

        let data = self.data_ptr();
        if data.is_null() || self.buffer_len <= 0 {
            return ConversionResult::Success;
        }

        let capacity = self.buffer_len as usize;
        let room = if nul_terminate { capacity - 1 } else { capacity };
        let copied = bytes.len().min(room);

        // SAFETY: at most `buffer_len` bytes are written, which `new` requires to be valid.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), data.cast::<u8>(), copied);
            if nul_terminate {
                data.cast::<u8>().add(copied).write(0);
            }
        }

        if copied < bytes.len() {
            ConversionResult::VarlenDataTruncated
        } else {
            ConversionResult::Success
        }
    }

    /// Write a NULL: `SQL_NULL_DATA` into the indicator.
    pub fn put_null(&self) -> ConversionResult {
        if self.res_len_ptr().is_null() {
            return ConversionResult::IndicatorRequired;
        }
        self.write_res_len(SQL_NULL_DATA);
        ConversionResult::Success
    }

    /// Write `s` as a NUL-terminated string, reporting its full length.
    pub fn put_string(&self, s: &str) -> ConversionResult {
        self.put_bytes(s.as_bytes(), true)
    }

    /// Convert `value` to the buffer's C type and write it.
    pub fn put_value(&self, value: &Value) -> ConversionResult {
        if value.is_null() {
            return self.put_null();
        }

        match self.target_type {
            CDataType::Char => self.put_string(&value_to_string(value)),
            CDataType::Binary => match value {
                Value::String(s) => self.put_bytes(s.as_bytes(), false),
                Value::Array(items) => match bytes_from_array(items) {
                    Some(bytes) => self.put_bytes(&bytes, false),
                    None => ConversionResult::Fail,
                },
                _ => ConversionResult::Fail,
            },
            CDataType::Bit => match value_to_i64(value) {
                Some(v) => self.put_fixed::<u8>(u8::from(v != 0)),
                None => ConversionResult::Fail,
            },
            CDataType::TinyInt => self.put_integer::<i8>(value),
            CDataType::UTinyInt => self.put_integer::<u8>(value),
            CDataType::Short => self.put_integer::<i16>(value),
            CDataType::UShort => self.put_integer::<u16>(value),
            CDataType::Long => self.put_integer::<i32>(value),
            CDataType::ULong => self.put_integer::<u32>(value),
            CDataType::BigInt => self.put_integer::<i64>(value),
            CDataType::UBigInt => match value.as_u64().or_else(|| {
                value_to_i64(value).and_then(|v| u64::try_from(v).ok())
            }) {
                Some(v) => self.put_fixed(v),
                None => ConversionResult::Fail,
            },
            CDataType::Float => match value_to_f64(value) {
                Some(v) => self.put_fixed(v as f32),
                None => ConversionResult::Fail,
            },
            CDataType::Double => match value_to_f64(value) {
                Some(v) => self.put_fixed(v),
                None => ConversionResult::Fail,
            },
            CDataType::Default => match value {
                Value::Bool(b) => self.put_fixed::<u8>(u8::from(*b)),
                Value::Number(n) if n.is_i64() => self.put_integer::<i64>(value),
                Value::Number(_) => match value_to_f64(value) {
                    Some(v) => self.put_fixed(v),
                    None => ConversionResult::Fail,
                },
                other => self.put_string(&value_to_string(other)),
            },
        }
    }

    fn put_integer<T: Copy + TryFrom<i64>>(&self, value: &Value) -> ConversionResult {
        match value_to_i64(value).and_then(|v| T::try_from(v).ok()) {
            Some(v) => self.put_fixed(v),
            None => ConversionResult::Fail,
        }
    }

    fn read_fixed<T: Copy>(&self) -> Option<T> {
        let data = self.data_ptr();
        if data.is_null() {
            None
        } else {
            // SAFETY: validity at every installed offset is a precondition of `new`.
            Some(unsafe { data.cast::<T>().read_unaligned() })
        }
    }

    fn read_bytes(&self, len: Option<isize>) -> Vec<u8> {
        let data = self.data_ptr();
        if data.is_null() {
            return Vec::new();
        }

        let capacity = self.buffer_len.max(0) as usize;
        let len = match len {
            Some(len) if len >= 0 => (len as usize).min(capacity),
            _ => {
                // SAFETY: scan is bounded by `buffer_len`, valid per `new`.
                let bytes = unsafe { std::slice::from_raw_parts(data.cast::<u8>(), capacity) };
                bytes.iter().position(|&b| b == 0).unwrap_or(capacity)
            }
        };

        // SAFETY: `len` never exceeds `buffer_len`.
        unsafe { std::slice::from_raw_parts(data.cast::<u8>(), len) }.to_vec()
    }

    /// Read the buffer back as a value, honouring `SQL_NULL_DATA` and `SQL_NTS`.
    pub fn get_value(&self) -> Value {
        let res_len = self.read_res_len();
        if res_len == Some(SQL_NULL_DATA) {
            return Value::Null;
        }

        let string_len = res_len.filter(|&len| len != SQL_NTS);

        match self.target_type {
            CDataType::Char | CDataType::Default => {
                let bytes = self.read_bytes(string_len);
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
            CDataType::Binary => {
                let bytes = self.read_bytes(Some(res_len.unwrap_or(self.buffer_len)));
                Value::Array(bytes.into_iter().map(Value::from).collect())
            }
            CDataType::Bit => self
                .read_fixed::<u8>()
                .map_or(Value::Null, |v| Value::Bool(v != 0)),
            CDataType::TinyInt => self.read_fixed::<i8>().map_or(Value::Null, Value::from),
            CDataType::UTinyInt => self.read_fixed::<u8>().map_or(Value::Null, Value::from),
            CDataType::Short => self.read_fixed::<i16>().map_or(Value::Null, Value::from),
            CDataType::UShort => self.read_fixed::<u16>().map_or(Value::Null, Value::from),
            CDataType::Long => self.read_fixed::<i32>().map_or(Value::Null, Value::from),
            CDataType::ULong => self.read_fixed::<u32>().map_or(Value::Null, Value::from),
            CDataType::BigInt => self.read_fixed::<i64>().map_or(Value::Null, Value::from),
            CDataType::UBigInt => self.read_fixed::<u64>().map_or(Value::Null, Value::from),
            CDataType::Float => self
                .read_fixed::<f32>()
                .and_then(|v| Number::from_f64(f64::from(v)))
                .map_or(Value::Null, Value::Number),
            CDataType::Double => self
                .read_fixed::<f64>()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        other => other.to_string(),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bytes_from_array(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn char_buffer(data: &mut [u8], len: &mut isize) -> ApplicationDataBuffer {
        unsafe {
            ApplicationDataBuffer::new(
                CDataType::Char,
                data.as_mut_ptr().cast(),
                data.len() as isize,
                len,
            )
        }
    }

    #[test]
    fn test_c_type_codes() {
        assert_eq!(CDataType::from_odbc(1), Some(CDataType::Char));
        assert_eq!(CDataType::from_odbc(-25), Some(CDataType::BigInt));
        assert_eq!(CDataType::from_odbc(1234), None);
    }

    #[test]
    fn test_put_string_fits() {
        let mut data = [0xffu8; 8];
        let mut len = 0isize;
        let buffer = char_buffer(&mut data, &mut len);

        assert_eq!(buffer.put_string("abc"), ConversionResult::Success);
        assert_eq!(len, 3);
        assert_eq!(&data[..4], b"abc\0");
    }

    #[test]
    fn test_put_string_truncates_and_reports_full_length() {
        let mut data = [0u8; 4];
        let mut len = 0isize;
        let buffer = char_buffer(&mut data, &mut len);

        assert_eq!(
            buffer.put_string("abcdef"),
            ConversionResult::VarlenDataTruncated
        );
        assert_eq!(len, 6);
        assert_eq!(&data, b"abc\0");
    }

    #[test]
    fn test_put_null_requires_indicator() {
        let mut value = 0i64;
        let buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::BigInt,
                (&mut value as *mut i64).cast(),
                8,
                ptr::null_mut(),
            )
        };
        assert_eq!(
            buffer.put_value(&Value::Null),
            ConversionResult::IndicatorRequired
        );

        let mut len = 0isize;
        let buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::BigInt,
                (&mut value as *mut i64).cast(),
                8,
                &mut len,
            )
        };
        assert_eq!(buffer.put_value(&Value::Null), ConversionResult::Success);
        assert_eq!(len, SQL_NULL_DATA);
    }

    #[test]
    fn test_put_integers() {
        let mut value = 0i32;
        let mut len = 0isize;
        let buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::Long,
                (&mut value as *mut i32).cast(),
                4,
                &mut len,
            )
        };

        assert_eq!(buffer.put_value(&json!(42)), ConversionResult::Success);
        assert_eq!(value, 42);
        assert_eq!(len, 4);

        assert_eq!(buffer.put_value(&json!("17")), ConversionResult::Success);
        assert_eq!(value, 17);

        assert_eq!(
            buffer.put_value(&json!(i64::MAX)),
            ConversionResult::Fail
        );
        assert_eq!(buffer.put_value(&json!("x")), ConversionResult::Fail);
    }

    #[test]
    fn test_put_double_and_bit() {
        let mut value = 0f64;
        let buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::Double,
                (&mut value as *mut f64).cast(),
                8,
                ptr::null_mut(),
            )
        };
        assert_eq!(buffer.put_value(&json!(2.5)), ConversionResult::Success);
        assert_eq!(value, 2.5);

        let mut bit = 0u8;
        let buffer = unsafe {
            ApplicationDataBuffer::new(CDataType::Bit, (&mut bit as *mut u8).cast(), 1, ptr::null_mut())
        };
        assert_eq!(buffer.put_value(&json!(true)), ConversionResult::Success);
        assert_eq!(bit, 1);
    }

    #[test]
    fn test_offset_is_read_at_access_time() {
        let mut rows = [0i64; 3];
        let offset = BindOffset::new();
        let mut shift = 0usize;

        let mut buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::BigInt,
                rows.as_mut_ptr().cast(),
                8,
                ptr::null_mut(),
            )
        };
        buffer.link_offset(offset.clone());
        unsafe { offset.set(&mut shift) };

        buffer.put_value(&json!(1));
        shift = 2 * size_of::<i64>();
        buffer.put_value(&json!(3));

        assert_eq!(rows, [1, 0, 3]);
    }

    #[test]
    fn test_get_value_nts_and_null() {
        let mut data = *b"hi\0zzzz";
        let mut len = SQL_NTS;
        let buffer = char_buffer(&mut data, &mut len);
        assert_eq!(buffer.get_value(), json!("hi"));

        len = SQL_NULL_DATA;
        let buffer = char_buffer(&mut data, &mut len);
        assert_eq!(buffer.get_value(), Value::Null);

        len = 5;
        let buffer = char_buffer(&mut data, &mut len);
        assert_eq!(buffer.get_value(), json!("hi\u{0}zz"));
    }

    #[test]
    fn test_get_value_numeric() {
        let mut value = -7i16;
        let buffer = unsafe {
            ApplicationDataBuffer::new(
                CDataType::Short,
                (&mut value as *mut i16).cast(),
                2,
                ptr::null_mut(),
            )
        };
        assert_eq!(buffer.get_value(), json!(-7));
    }
}

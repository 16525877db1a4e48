//! Small helpers shared across the statement layer.

/// Copy `value` into `dst` as a NUL-terminated string.
///
/// Copies as many bytes as fit before the terminator. Returns `true` if the
/// value was truncated. An empty `dst` receives nothing and counts as
/// truncated unless `value` is empty.
pub fn copy_string_to_buffer(value: &str, dst: &mut [u8]) -> bool {
    let bytes = value.as_bytes();

    let Some(capacity) = dst.len().checked_sub(1) else {
        return !bytes.is_empty();
    };

    let len = bytes.len().min(capacity);
    dst[..len].copy_from_slice(&bytes[..len]);
    dst[len] = 0;

    len < bytes.len()
}

//! The closed set of column types a table may contain, and the typed
//! [`Value`] a cell reads back as.

use crate::error::ColumnTypeError;

/// A column's storage type. Fixed-width numeric types store their bytes
/// little-endian; `ByteString` stores a one-byte length prefix followed by
/// `max_len` bytes of payload (unused trailing bytes are zeroed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    /// A fixed-capacity byte string. `max_len` must fit in a `u8` (255),
    /// since the length prefix occupying the slot's first byte can encode
    /// no more.
    ByteString(u8),
}

impl ColumnType {
    /// The numeric tag used in the on-disk/on-wire header.
    pub fn code(self) -> u8 {
        match self {
            ColumnType::Int8 => 0,
            ColumnType::Uint8 => 1,
            ColumnType::Int16 => 2,
            ColumnType::Uint16 => 3,
            ColumnType::Int32 => 4,
            ColumnType::Uint32 => 5,
            ColumnType::Float32 => 6,
            ColumnType::ByteString(_) => 7,
        }
    }

    /// Reconstructs a `ColumnType` from its wire tag and declared slot
    /// size. For fixed-width types `size` must match exactly; for
    /// `ByteString`, `size` is `1 + max_len`.
    pub fn from_code(code: u8, size: u32) -> Result<Self, ColumnTypeError> {
        let ty = match code {
            0 => ColumnType::Int8,
            1 => ColumnType::Uint8,
            2 => ColumnType::Int16,
            3 => ColumnType::Uint16,
            4 => ColumnType::Int32,
            5 => ColumnType::Uint32,
            6 => ColumnType::Float32,
            7 => {
                let max_len = size
                    .checked_sub(1)
                    .ok_or(ColumnTypeError::InvalidSize { code, size })?;
                let max_len: u8 = max_len
                    .try_into()
                    .map_err(|_| ColumnTypeError::InvalidSize { code, size })?;
                ColumnType::ByteString(max_len)
            }
            other => return Err(ColumnTypeError::UnknownCode(other)),
        };
        if ty.size_bytes() != size {
            return Err(ColumnTypeError::InvalidSize { code, size });
        }
        Ok(ty)
    }

    /// The number of bytes this type occupies in a row.
    pub fn size_bytes(self) -> u32 {
        match self {
            ColumnType::Int8 | ColumnType::Uint8 => 1,
            ColumnType::Int16 | ColumnType::Uint16 => 2,
            ColumnType::Int32 | ColumnType::Uint32 | ColumnType::Float32 => 4,
            ColumnType::ByteString(max_len) => 1 + u32::from(max_len),
        }
    }

    /// The natural alignment used when packing this column into a row.
    pub fn align(self) -> u32 {
        match self {
            ColumnType::Int8 | ColumnType::Uint8 | ColumnType::ByteString(_) => 1,
            ColumnType::Int16 | ColumnType::Uint16 => 2,
            ColumnType::Int32 | ColumnType::Uint32 | ColumnType::Float32 => 4,
        }
    }

    /// Whether this is the variable-length-payload `ByteString` type.
    pub fn is_byte_string(self) -> bool {
        matches!(self, ColumnType::ByteString(_))
    }
}

/// A column's declared name and type, in the order the caller wants to read
/// and write them back (the caller-visible "original" order, independent of
/// how the header packs them in memory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A single cell's value, read out of or about to be written into a row.
///
/// `ByteString` borrows directly from the row's backing bytes (or, on the
/// write path, from whatever buffer the caller supplied) — no allocation or
/// copy happens to produce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Float32(f32),
    ByteString(&'a [u8]),
}

impl<'a> Value<'a> {
    /// The `ColumnType` this value would be written as.
    pub fn column_type(&self, max_len: u8) -> ColumnType {
        match self {
            Value::Int8(_) => ColumnType::Int8,
            Value::Uint8(_) => ColumnType::Uint8,
            Value::Int16(_) => ColumnType::Int16,
            Value::Uint16(_) => ColumnType::Uint16,
            Value::Int32(_) => ColumnType::Int32,
            Value::Uint32(_) => ColumnType::Uint32,
            Value::Float32(_) => ColumnType::Float32,
            Value::ByteString(_) => ColumnType::ByteString(max_len),
        }
    }

    /// Interprets this value as a signed 64-bit integer, for numeric
    /// comparisons that must work across all integer column types.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::Uint8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::Uint16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Uint32(v) => Some(v as i64),
            Value::Float32(_) | Value::ByteString(_) => None,
        }
    }

    /// Interprets this value as an `f64`, for numeric comparisons that must
    /// work across integer and floating-point column types alike.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(v) => Some(f64::from(v)),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// The raw bytes of a `ByteString` value, if this is one.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }
}

/// Case-insensitive (ASCII-folded) byte-string equality, matching the
/// column-level `equalsCase` comparison used by filter predicates.
pub fn equals_case(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignore_ascii_case(y))
}

/// Case-insensitive (ASCII-folded) byte-string substring search, matching
/// the column-level `containsCase` comparison used by filter predicates.
pub fn contains_case(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| equals_case(window, needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_string_round_trips_through_code() {
        let ty = ColumnType::ByteString(31);
        let reconstructed = ColumnType::from_code(ty.code(), ty.size_bytes()).unwrap();
        assert_eq!(ty, reconstructed);
    }

    #[test]
    fn contains_case_is_ascii_fold_insensitive() {
        assert!(contains_case(b"Hello, World", b"WORLD"));
        assert!(!contains_case(b"Hello, World", b"moon"));
        assert!(contains_case(b"anything", b""));
    }

    #[test]
    fn equals_case_requires_same_length() {
        assert!(equals_case(b"ABC", b"abc"));
        assert!(!equals_case(b"ABC", b"abcd"));
    }
}

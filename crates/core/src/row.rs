//! Zero-copy row cursors.
//!
//! A cell is read or written through an [`Accessor`] — a plain
//! `(column_offset, column_type)` pair — and a pair of free functions,
//! [`read`] and [`write`], rather than through a closure captured over the
//! row. Binding a getter/setter pair to a `FnMut` closure per column
//! forces an allocation (or at least an indirect call) per cell and, worse,
//! keeps a borrow of the row alive for the closure's lifetime, which is
//! awkward once a `Row`'s index is meant to move across a whole column of
//! rows during a scan. An `Accessor` is `Copy`, trivially shareable across
//! worker threads, and the read/write it describes only needs the row's
//! current byte slice, not the row object itself.

use crate::column::{ColumnType, Value};
use crate::error::BoundsError;
use crate::header::Header;
use crate::table::Table;

/// Where a column lives within a row, and how to interpret the bytes there.
/// Cheap to copy, cheap to precompute once per column and reuse across
/// every row in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor {
    pub column_offset: u32,
    pub column_type: ColumnType,
}

impl Accessor {
    pub fn new(column_offset: u32, column_type: ColumnType) -> Self {
        Self { column_offset, column_type }
    }
}

/// Reads the cell described by `accessor` out of `row`, a byte slice
/// spanning exactly one row (`row.len() >= row_stride`, the table's
/// `rowLength`).
///
/// # Panics
/// Panics if `row` is too short for `accessor`'s column slot.
pub fn read<'a>(row: &'a [u8], accessor: Accessor) -> Value<'a> {
    let off = accessor.column_offset as usize;
    match accessor.column_type {
        ColumnType::Int8 => Value::Int8(row[off] as i8),
        ColumnType::Uint8 => Value::Uint8(row[off]),
        ColumnType::Int16 => Value::Int16(i16::from_le_bytes(row[off..off + 2].try_into().unwrap())),
        ColumnType::Uint16 => Value::Uint16(u16::from_le_bytes(row[off..off + 2].try_into().unwrap())),
        ColumnType::Int32 => Value::Int32(i32::from_le_bytes(row[off..off + 4].try_into().unwrap())),
        ColumnType::Uint32 => Value::Uint32(u32::from_le_bytes(row[off..off + 4].try_into().unwrap())),
        ColumnType::Float32 => Value::Float32(f32::from_le_bytes(row[off..off + 4].try_into().unwrap())),
        ColumnType::ByteString(max_len) => {
            let len = row[off] as usize;
            let start = off + 1;
            debug_assert!(len <= max_len as usize);
            Value::ByteString(&row[start..start + len])
        }
    }
}

/// Writes `value` into the cell described by `accessor` within `row`.
///
/// # Panics
/// Panics if `value`'s variant does not match `accessor.column_type`, or if
/// `row` is too short for the column slot.
pub fn write(row: &mut [u8], accessor: Accessor, value: &Value) {
    let off = accessor.column_offset as usize;
    match (accessor.column_type, value) {
        (ColumnType::Int8, Value::Int8(v)) => row[off] = *v as u8,
        (ColumnType::Uint8, Value::Uint8(v)) => row[off] = *v,
        (ColumnType::Int16, Value::Int16(v)) => row[off..off + 2].copy_from_slice(&v.to_le_bytes()),
        (ColumnType::Uint16, Value::Uint16(v)) => row[off..off + 2].copy_from_slice(&v.to_le_bytes()),
        (ColumnType::Int32, Value::Int32(v)) => row[off..off + 4].copy_from_slice(&v.to_le_bytes()),
        (ColumnType::Uint32, Value::Uint32(v)) => row[off..off + 4].copy_from_slice(&v.to_le_bytes()),
        (ColumnType::Float32, Value::Float32(v)) => row[off..off + 4].copy_from_slice(&v.to_le_bytes()),
        (ColumnType::ByteString(max_len), Value::ByteString(bytes)) => {
            let n = bytes.len().min(max_len as usize);
            row[off] = n as u8;
            row[off + 1..off + 1 + n].copy_from_slice(&bytes[..n]);
            for b in &mut row[off + 1 + n..off + 1 + max_len as usize] {
                *b = 0;
            }
        }
        (ty, value) => panic!("accessor of type {ty:?} cannot hold value {value:?}"),
    }
}

/// A cursor over a single row of a [`Table`]: an index plus the column
/// directory needed to find and interpret each cell. Moving the cursor to
/// a different row (`set_index`) is just writing an integer; no bytes move
/// and no accessor is recomputed.
pub struct Row<'t> {
    table: &'t Table,
    index: u32,
}

impl<'t> Row<'t> {
    pub(crate) fn new(table: &'t Table, index: u32) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    fn header(&self) -> &Header {
        self.table.header()
    }

    fn row_bounds(&self) -> (u32, u32) {
        let header = self.header();
        let start = header.data_length() + self.index * header.row_length();
        (start, header.row_length())
    }

    fn row_slice(&self) -> &[u8] {
        let (start, len) = self.row_bounds();
        &self.table.region().as_bytes()[start as usize..(start + len) as usize]
    }

    #[allow(clippy::mut_from_ref)]
    fn row_slice_mut(&self) -> &mut [u8] {
        let (start, len) = self.row_bounds();
        // SAFETY: every `Row` handed to scan/write code is given a row
        // index that belongs exclusively to the thread holding it — either
        // a read-only source row shared immutably by every worker, or a
        // freshly reserved result row nobody else has a handle to yet.
        unsafe { self.table.region().bytes_mut_at(start, len) }
    }

    /// Reads the named column's value out of the current row.
    pub fn get(&self, name: &str) -> Result<Value<'_>, BoundsError> {
        let record = self
            .header()
            .column_by_name(name)
            .ok_or_else(|| BoundsError::UnknownColumn { name: name.to_owned() })?;
        let accessor = Accessor::new(record.offset_in_row, record.column_type);
        Ok(read(self.row_slice(), accessor))
    }

    /// Reads a column's value using a precomputed [`Accessor`], skipping
    /// the by-name lookup. This is the path the filter executor and the
    /// result writer use once per scan, not per row.
    pub fn get_with(&self, accessor: Accessor) -> Value<'_> {
        read(self.row_slice(), accessor)
    }

    /// Writes a value into the named column of the current row.
    pub fn set(&self, name: &str, value: &Value) -> Result<(), BoundsError> {
        let record = self
            .header()
            .column_by_name(name)
            .ok_or_else(|| BoundsError::UnknownColumn { name: name.to_owned() })?;
        let accessor = Accessor::new(record.offset_in_row, record.column_type);
        write(self.row_slice_mut(), accessor, value);
        Ok(())
    }

    /// Writes a value using a precomputed [`Accessor`].
    pub fn set_with(&self, accessor: Accessor, value: &Value) {
        write(self.row_slice_mut(), accessor, value);
    }
}

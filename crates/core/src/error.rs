//! Error types owned by `tablerace-core`.
//!
//! Each subsystem gets its own `thiserror` enum, mirroring how the error
//! surface of this crate's teacher is split per concern rather than
//! funneled through one catch-all type.

use thiserror::Error;

/// Errors raised while decoding a [`ColumnType`](crate::column::ColumnType)
/// from its wire representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnTypeError {
    #[error("unknown column type code {0}")]
    UnknownCode(u8),
    #[error("column type code {code} is not valid for declared size {size}")]
    InvalidSize { code: u8, size: u32 },
}

/// Errors raised while parsing or stamping a table [`Header`](crate::header::Header).
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("bad magic number: expected {expected:#x}, found {found:#x}")]
    BadMagic { expected: u32, found: u32 },
    #[error("unsupported header version {found}, expected {expected}")]
    UnsupportedVersion { expected: u32, found: u32 },
    #[error("header claims {claimed} bytes but region is only {available} bytes")]
    RegionTooSmall { claimed: u32, available: u32 },
    #[error("column {index}: {source}")]
    Column {
        index: u32,
        #[source]
        source: ColumnTypeError,
    },
    #[error("column name at offset {offset} is not valid UTF-8")]
    InvalidColumnName { offset: u32 },
    #[error("string table entry at offset {offset} runs past the header's declared length")]
    StringTableOverrun { offset: u32 },
}

/// Errors raised when a table operation would exceed the capacity of its
/// backing region.
///
/// The atomic `rowCount` counter can run ahead of the region's actual row
/// capacity under concurrent `add_rows` calls; this error is the caller's
/// signal to stop writing before it turns that overrun into an out-of-bounds
/// byte write. See the `CapacityError` notes on row capacity in the crate's
/// design documentation for why the counter itself is never rolled back.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row capacity exceeded: requested row count {requested}, capacity is {capacity_rows} rows")]
pub struct CapacityError {
    pub requested: u32,
    pub capacity_rows: u32,
}

/// Errors raised when a row index or column access falls outside the
/// table's bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundsError {
    #[error("row index {index} out of bounds for table with {row_count} rows")]
    RowIndex { index: u32, row_count: u32 },
    #[error("no column named {name:?}")]
    UnknownColumn { name: String },
}

/// Raised when an operation is attempted on a [`Table`](crate::table::Table)
/// whose backing region has already been freed via `destroy`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("use of table after destroy()")]
pub struct UseAfterFreeError;

/// The umbrella error for fallible `Table` construction.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    UseAfterFree(#[from] UseAfterFreeError),
}

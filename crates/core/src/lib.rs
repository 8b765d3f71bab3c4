//! Binary columnar table layout and zero-copy row cursors.
//!
//! This crate owns the on-wire/on-heap table format (see [`header`] for the
//! byte layout), the [`column::ColumnType`] closed set, and the
//! [`row::Accessor`]-based row cursor used to read and write cells without
//! copying. It has no opinion about filtering or parallel scanning; those
//! live in `tablerace-filter` and `tablerace-worker`, built on top of the
//! types here.

pub mod column;
pub mod error;
pub mod header;
pub mod region;
pub mod row;
pub mod table;

pub use column::{ColumnDescriptor, ColumnType, Value};
pub use error::{BoundsError, CapacityError, ColumnTypeError, HeaderError, TableError, UseAfterFreeError};
pub use header::{ColumnRecord, Header};
pub use region::ByteRegion;
pub use row::{Accessor, Row};
pub use table::Table;

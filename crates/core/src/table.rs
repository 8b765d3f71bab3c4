//! The binary table: a [`Header`] bound to a [`ByteRegion`], plus the
//! operations for creating rows, reserving more of them, and reading the
//! result back out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::instrument;

use crate::column::ColumnDescriptor;
use crate::error::{BoundsError, CapacityError, TableError, UseAfterFreeError};
use crate::header::{binary_from_columns, Header};
use crate::region::ByteRegion;
use crate::row::Row;

/// A columnar, binary, in-memory table: a header describing its columns
/// and row geometry, followed by row-major row data.
///
/// `Table` is cheap to clone — clones share the same backing region and
/// the same `destroyed` flag — which is how a table handle is handed to
/// every worker thread in a scan.
#[derive(Clone)]
pub struct Table {
    region: ByteRegion,
    header: Header,
    destroyed: Arc<AtomicBool>,
}

impl Table {
    /// Allocates a new region sized for `columns` and `capacity_rows` rows,
    /// and stamps a fresh header into it.
    #[instrument(level = "trace", skip(columns))]
    pub fn empty_from_columns(columns: &[ColumnDescriptor], capacity_rows: u32) -> Result<Table, TableError> {
        let image = binary_from_columns(columns);
        let row_length = {
            // `binary_from_columns` already computed this; re-derive it
            // cheaply from the image rather than threading it through an
            // extra return value.
            u32::from_le_bytes(image[12..16].try_into().unwrap())
        };
        let size = image.len() as u32 + row_length.saturating_mul(capacity_rows);
        let region = ByteRegion::allocate(size);
        Self::empty_in_region(columns, region)
    }

    /// Stamps a fresh header for `columns` into a caller-provided region.
    /// Useful when the region's size (and therefore row capacity) is
    /// dictated by something other than a simple row count, e.g. the
    /// coordinator sizing a result table off the source table's row count.
    pub fn empty_in_region(columns: &[ColumnDescriptor], region: ByteRegion) -> Result<Table, TableError> {
        let image = binary_from_columns(columns);
        let header = Header::stamp(&image, &region)?;
        Ok(Table {
            region,
            header,
            destroyed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Binds to a table that already has a valid header written into
    /// `region` (for example, one a worker thread received a descriptor
    /// for).
    pub fn from_region(region: ByteRegion) -> Result<Table, TableError> {
        let header = Header::parse(region.clone())?;
        Ok(Table {
            region,
            header,
            destroyed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn check_alive(&self) -> Result<(), UseAfterFreeError> {
        if self.destroyed.load(Ordering::Acquire) {
            Err(UseAfterFreeError)
        } else {
            Ok(())
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub(crate) fn region(&self) -> &ByteRegion {
        &self.region
    }

    pub fn row_count(&self) -> u32 {
        self.header.row_count()
    }

    pub fn capacity_rows(&self) -> u32 {
        self.header.capacity_rows()
    }

    /// Atomically reserves `n` more rows and returns the index the first
    /// one starts at. Every caller that wins a distinct reservation owns a
    /// disjoint range of rows to write into.
    ///
    /// Returns [`CapacityError`] if the reservation would exceed the
    /// region's row capacity. The atomic counter itself is not rolled
    /// back on failure — see [`CapacityError`]'s documentation — so a
    /// caller that hits this should stop reserving rather than retry.
    pub fn add_rows(&self, n: u32) -> Result<u32, CapacityError> {
        let old = self.header.reserve_rows(n);
        let new_count = old.saturating_add(n);
        let capacity = self.capacity_rows();
        if new_count > capacity {
            return Err(CapacityError { requested: new_count, capacity_rows: capacity });
        }
        Ok(old)
    }

    /// A read/write cursor over row `index`, interpreting byte-string
    /// columns as raw byte slices.
    pub fn get_row(&self, index: u32) -> Result<Row<'_>, TableError> {
        self.check_alive()?;
        let row_count = self.row_count();
        if index >= row_count {
            return Err(BoundsError::RowIndex { index, row_count }.into());
        }
        Ok(Row::new(self, index))
    }

    /// A cursor over row `index` without checking it against the current
    /// `row_count`. Used by the scan loop, which claims rows via an atomic
    /// cursor that is always `< row_count` by construction and would
    /// otherwise pay a redundant atomic load per row.
    pub fn get_row_unchecked(&self, index: u32) -> Row<'_> {
        debug_assert!(!self.destroyed.load(Ordering::Acquire), "use of table after destroy()");
        Row::new(self, index)
    }

    /// Releases this table's handle to its backing region and marks every
    /// clone of this `Table` as destroyed. Rows created after this point
    /// (on any clone) fail with [`UseAfterFreeError`].
    pub fn destroy(self) {
        self.destroyed.store(true, Ordering::Release);
        self.region.free();
    }

    /// As [`Table::add_rows`], but first checks that the table has not
    /// been destroyed.
    pub fn add_rows_checked(&self, n: u32) -> Result<u32, TableError> {
        self.check_alive()?;
        Ok(self.add_rows(n)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, Value};

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", ColumnType::Uint32),
            ColumnDescriptor::new("label", ColumnType::ByteString(15)),
        ]
    }

    #[test]
    fn empty_table_has_zero_rows() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn add_rows_then_write_then_read_round_trips() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        let start = table.add_rows(2).unwrap();
        assert_eq!(start, 0);
        assert_eq!(table.row_count(), 2, "add_rows publishes the reserved count immediately");

        let row0 = table.get_row_unchecked(0);
        row0.set("id", &Value::Uint32(7)).unwrap();
        row0.set("label", &Value::ByteString(b"alpha")).unwrap();

        let row1 = table.get_row_unchecked(1);
        row1.set("id", &Value::Uint32(9)).unwrap();
        row1.set("label", &Value::ByteString(b"beta")).unwrap();

        let row0 = table.get_row(0).unwrap();
        assert_eq!(row0.get("id").unwrap(), Value::Uint32(7));
        assert_eq!(row0.get("label").unwrap(), Value::ByteString(b"alpha"));
        let row1 = table.get_row(1).unwrap();
        assert_eq!(row1.get("id").unwrap(), Value::Uint32(9));
    }

    #[test]
    fn add_rows_reservations_are_disjoint_and_capacity_checked() {
        let table = Table::empty_from_columns(&columns(), 2).unwrap();
        assert_eq!(table.add_rows(2).unwrap(), 0);
        let err = table.add_rows(1).unwrap_err();
        assert_eq!(err.capacity_rows, 2);
    }

    #[test]
    fn get_row_rejects_out_of_bounds_index() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        table.add_rows(1).unwrap();
        let err = table.get_row(5).unwrap_err();
        assert!(matches!(err, TableError::Bounds(BoundsError::RowIndex { index: 5, row_count: 1 })));
    }

    #[test]
    fn destroy_marks_all_clones_dead() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        let clone = table.clone();
        table.destroy();
        assert!(clone.add_rows_checked(1).is_err());
    }

    #[test]
    fn get_row_after_destroy_is_a_use_after_free_error() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        table.add_rows(1).unwrap();
        let clone = table.clone();
        table.destroy();
        let err = clone.get_row(0).unwrap_err();
        assert!(matches!(err, TableError::UseAfterFree(UseAfterFreeError)));
    }

    #[test]
    #[should_panic(expected = "use of table after destroy()")]
    fn get_row_unchecked_after_destroy_trips_a_debug_assertion() {
        let table = Table::empty_from_columns(&columns(), 4).unwrap();
        table.add_rows(1).unwrap();
        let clone = table.clone();
        table.destroy();
        clone.get_row_unchecked(0);
    }
}

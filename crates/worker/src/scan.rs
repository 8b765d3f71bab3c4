//! The batched parallel scan loop: claim a batch of row indices from the
//! shared [`ScanCursor`], test each row against a compiled filter, and
//! append matches to the shared result table.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tablerace_core::{CapacityError, Table};
use tablerace_filter::{CompiledFilter, CompiledWriter};
use tracing::trace;

use crate::cursor::ScanCursor;

/// Optional, shared live-progress counters for a scan. Incrementing these
/// costs an extra pair of relaxed atomic adds per batch; a caller that
/// does not need live progress (e.g. a one-shot batch job) can omit it
/// entirely by passing `None`.
#[derive(Debug, Default)]
pub struct ScanStats {
    scanned: AtomicU64,
    matched: AtomicU64,
    busy_nanos: AtomicU64,
}

impl ScanStats {
    pub fn scanned(&self) -> u64 {
        self.scanned.load(Ordering::Relaxed)
    }

    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    /// Summed wall-clock time every worker has spent inside [`run_scan`]
    /// so far, across however many workers share this `ScanStats`. Not a
    /// wall-clock total for the scan as a whole — workers run concurrently,
    /// so this can exceed the time the coordinator actually waited.
    pub fn busy_time(&self) -> Duration {
        Duration::from_nanos(self.busy_nanos.load(Ordering::Relaxed))
    }
}

/// One worker's tally from a single call to [`run_scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOutcome {
    pub scanned: u32,
    pub matched: u32,
    /// Wall-clock time this call spent draining the cursor.
    pub elapsed: Duration,
}

/// Runs the batched scan loop until `cursor` is exhausted against
/// `source`'s row count at the time this call started.
///
/// Multiple threads may call this concurrently with the same `source`,
/// `cursor`, `filter`, `writer`, and `result`: each fetch-add on the
/// cursor hands out a disjoint `[start, end)` range of source row
/// indices, and each reservation on `result.add_rows` hands out a
/// disjoint range of destination row indices, so no two threads ever
/// write the same byte.
pub fn run_scan(
    source: &Table,
    cursor: &ScanCursor,
    filter: &CompiledFilter,
    writer: &CompiledWriter,
    result: &Table,
    batch_size: u32,
    stats: Option<&ScanStats>,
) -> Result<ScanOutcome, CapacityError> {
    let started = Instant::now();
    let limit = source.row_count();
    let mut outcome = ScanOutcome::default();

    while let Some((start, end)) = cursor.claim_batch(batch_size, limit) {
        trace!(start, end, "claimed batch");
        for index in start..end {
            let row = source.get_row_unchecked(index);
            outcome.scanned += 1;
            if filter.test(&row) {
                let dest_index = result.add_rows(1)?;
                let dest_row = result.get_row_unchecked(dest_index);
                writer.write_row(&row, &dest_row);
                outcome.matched += 1;
            }
        }
    }
    outcome.elapsed = started.elapsed();

    if let Some(stats) = stats {
        stats.scanned.fetch_add(u64::from(outcome.scanned), Ordering::Relaxed);
        stats.matched.fetch_add(u64::from(outcome.matched), Ordering::Relaxed);
        stats.busy_nanos.fetch_add(outcome.elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablerace_core::{ColumnDescriptor, ColumnType, Value};
    use tablerace_filter::{compile, compile_writer, FilterClause, FilterExpression, FilterOp, FilterRule, Mode, Operand, ResultDescription, ResultEntry};

    fn build_source(rows: &[(u32, &str)]) -> Table {
        let columns = vec![
            ColumnDescriptor::new("id", ColumnType::Uint32),
            ColumnDescriptor::new("name", ColumnType::ByteString(31)),
        ];
        let table = Table::empty_from_columns(&columns, rows.len() as u32).unwrap();
        table.add_rows(rows.len() as u32).unwrap();
        for (i, (id, name)) in rows.iter().enumerate() {
            let row = table.get_row_unchecked(i as u32);
            row.set("id", &Value::Uint32(*id)).unwrap();
            row.set("name", &Value::ByteString(name.as_bytes())).unwrap();
        }
        table
    }

    #[test]
    fn single_threaded_scan_matches_expected_rows_and_fills_stats() {
        let source = build_source(&[(1, "ada"), (2, "grace"), (3, "alan"), (4, "margaret")]);
        let expr = FilterExpression::new(
            Mode::Dnf,
            vec![FilterClause::new(vec![FilterRule::new("name", FilterOp::Contains, Operand::Text("a".into()))])],
        );
        let filter = compile(&expr, source.header()).unwrap();
        let result_desc = ResultDescription::new(vec![ResultEntry::column("id"), ResultEntry::row_index("sourceIndex")]);
        let result_columns = result_desc.resolve_columns(source.header()).unwrap();
        let result = Table::empty_from_columns(&result_columns, source.row_count()).unwrap();
        let writer = compile_writer(&result_desc, source.header(), result.header()).unwrap();

        let cursor = ScanCursor::new();
        let stats = ScanStats::default();
        let outcome = run_scan(&source, &cursor, &filter, &writer, &result, 2, Some(&stats)).unwrap();

        assert_eq!(outcome.scanned, 4);
        assert_eq!(outcome.matched, 3, "ada, grace, margaret contain 'a'; alan does not");
        assert_eq!(result.row_count(), 3);
        assert_eq!(stats.scanned(), 4);
        assert_eq!(stats.matched(), 3);
        assert!(stats.busy_time() >= outcome.elapsed, "a single scan's busy time is at least its own elapsed time");

        let first = result.get_row(0).unwrap();
        assert_eq!(first.get("sourceIndex").unwrap(), Value::Uint32(0));
    }
}

//! The shared scan cursor: a single atomic `u32` that every worker thread
//! races to fetch-add, claiming a disjoint batch of row indices each time.
//!
//! This reuses [`tablerace_core::ByteRegion`]'s atomic-field accessor
//! rather than introducing a second concurrency primitive, so the cursor
//! is built out of exactly the same mechanism the result table uses to
//! grow its row count.

use std::sync::atomic::Ordering;

use tablerace_core::ByteRegion;

/// How many bytes a `ScanCursor` occupies: one `u32`.
const CURSOR_SIZE: u32 = 4;

/// A shared "next row to claim" counter for a single scan job.
#[derive(Clone)]
pub struct ScanCursor {
    region: ByteRegion,
}

impl ScanCursor {
    /// Allocates a fresh cursor, starting at row 0.
    pub fn new() -> Self {
        Self { region: ByteRegion::allocate(CURSOR_SIZE) }
    }

    /// Claims the next batch of up to `batch_size` row indices, not
    /// exceeding `limit` (the source table's row count at scan start).
    /// Returns `None` once every row has been claimed.
    pub fn claim_batch(&self, batch_size: u32, limit: u32) -> Option<(u32, u32)> {
        let start = self.region.atomic_u32_at(0).fetch_add(batch_size, Ordering::AcqRel);
        if start >= limit {
            return None;
        }
        let end = start.saturating_add(batch_size).min(limit);
        Some((start, end))
    }

    /// The cursor's current position, for diagnostics.
    pub fn position(&self) -> u32 {
        self.region.atomic_u32_at(0).load(Ordering::Acquire)
    }
}

impl Default for ScanCursor {
    fn default() -> Self {
        Self::new()
    }
}

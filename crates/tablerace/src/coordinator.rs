//! Builds the source/result tables, spawns the worker pool, dispatches
//! the scan job, and assembles the final result.
//!
//! Grounded on the teacher's `util/jobs.rs` `JobCores`/`JobThread`
//! spawn-and-join pattern, adapted from async tasks parked on
//! `tokio::sync::{mpsc,oneshot}` to plain OS threads parked on
//! `crossbeam_channel`, since a scan worker has no await points — it is a
//! tight CPU-bound loop from the moment it receives `Start` to the moment
//! its cursor is exhausted.

use std::sync::Arc;

use tracing::{info, instrument};

use tablerace_core::Table;
use tablerace_filter::{compile, compile_writer, FilterExpression, ResultDescription};
use tablerace_worker::{InboundMessage, JobSpec, OutboundMessage, ScanCursor, ScanOutcome, ScanStats, WorkerHandle};

use crate::config::ScanConfig;
use crate::error::ScanError;

/// The outcome of a full, coordinated scan.
pub struct ScanResult {
    /// The result table: one row per matched source row, laid out per the
    /// `ResultDescription` the scan was run with.
    pub table: Table,
    /// Total rows scanned and matched across every worker.
    pub outcome: ScanOutcome,
    /// Live progress counters, if [`ScanConfig::collect_stats`] was set.
    /// By the time this function returns every worker has finished, so
    /// these counters equal `outcome`'s totals; they exist for a caller
    /// that wants to poll them *during* the scan via a cloned `Arc`.
    pub stats: Option<Arc<ScanStats>>,
}

/// Runs a filtered scan of `source`, matching `filter` and writing
/// `result_description`'s columns for every matching row, using `config`
/// to size the worker pool and batch size.
#[instrument(level = "trace", skip(source, filter, result_description, config))]
pub fn run(
    source: &Table,
    filter: &FilterExpression,
    result_description: &ResultDescription,
    config: ScanConfig,
) -> Result<ScanResult, ScanError> {
    let compiled_filter = Arc::new(compile(filter, source.header())?);

    let result_columns = result_description.resolve_columns(source.header())?;
    let result = Table::empty_from_columns(&result_columns, source.row_count())?;
    let compiled_writer = Arc::new(compile_writer(result_description, source.header(), result.header())?);

    let stats = config.collect_stats().then(|| Arc::new(ScanStats::default()));
    let cursor = ScanCursor::new();

    let worker_count = config.worker_count().max(1);
    info!(worker_count, row_count = source.row_count(), "starting scan");

    let workers: Vec<WorkerHandle> = (0..worker_count)
        .map(|i| WorkerHandle::spawn(format!("tablerace-worker-{i}"), stats.clone()))
        .collect();

    for worker in &workers {
        let job = JobSpec {
            source: source.clone(),
            result: result.clone(),
            cursor: cursor.clone(),
            filter: Arc::clone(&compiled_filter),
            writer: Arc::clone(&compiled_writer),
            row_batch_size: config.row_batch_size(),
        };
        worker.send(InboundMessage::Initialize(job))?;
        match worker.recv()? {
            OutboundMessage::Ready => {}
            OutboundMessage::Error(err) => return Err(err.into()),
            _ => unreachable!("worker protocol guarantees Initialize is answered with Ready or Error"),
        }
    }

    for worker in &workers {
        worker.send(InboundMessage::Start)?;
    }

    let mut outcome = ScanOutcome::default();
    for worker in &workers {
        match worker.recv()? {
            OutboundMessage::JobComplete(worker_outcome) => {
                outcome.scanned += worker_outcome.scanned;
                outcome.matched += worker_outcome.matched;
            }
            OutboundMessage::Error(err) => return Err(err.into()),
            _ => unreachable!("worker protocol guarantees Start is answered with JobComplete or Error"),
        }
    }

    for worker in workers {
        worker.shutdown();
    }

    info!(scanned = outcome.scanned, matched = outcome.matched, "scan complete");
    Ok(ScanResult { table: result, outcome, stats })
}

//! The message types exchanged between a coordinator and a worker thread.
//!
//! Messages carry live handles (`Table` clones, `Arc`-wrapped compiled
//! filters), not serialized bytes: workers and coordinator share one
//! process and one address space, so there is nothing to encode. What
//! crosses the channel is exactly what the teacher's `util/jobs.rs` sends
//! its job threads — a unit of work plus the means to report back.

use std::sync::Arc;

use tablerace_core::Table;
use tablerace_filter::{CompiledFilter, CompiledWriter};

use crate::cursor::ScanCursor;
use crate::error::WorkerError;
use crate::scan::ScanOutcome;

/// Everything a worker needs to run one scan job, handed to it once and
/// reused across however many batches it claims.
#[derive(Clone)]
pub struct JobSpec {
    pub source: Table,
    pub result: Table,
    pub cursor: ScanCursor,
    pub filter: Arc<CompiledFilter>,
    pub writer: Arc<CompiledWriter>,
    pub row_batch_size: u32,
}

/// A message sent from the coordinator to a worker.
pub enum InboundMessage {
    /// Hands the worker a job and moves it from `Uninitialized`/`Ready`
    /// into `Ready`.
    Initialize(JobSpec),
    /// Starts claiming batches from the job's cursor; moves the worker
    /// from `Ready` into `Processing`, then back to `Ready` once the
    /// cursor is exhausted.
    Start,
    /// Shuts the worker thread down for good.
    Terminate,
}

/// A message sent from a worker back to the coordinator.
pub enum OutboundMessage {
    /// The worker accepted an `Initialize` and is ready to `Start`.
    Ready,
    /// The worker finished draining the cursor for the current job.
    JobComplete(ScanOutcome),
    /// The worker rejected a message or hit an error mid-job.
    Error(WorkerError),
    /// The worker processed `Terminate` and its thread is about to exit.
    Terminated,
}

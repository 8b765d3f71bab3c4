//! The per-worker state machine: `Uninitialized -> Ready -> Processing ->
//! Ready -> Terminated`.
//!
//! Earlier designs centralized filter execution behind a single shared
//! "processor" object guarded by a lock, so every worker thread serialized
//! through it to pick up the next job. Giving each worker its own
//! `FilterProcessor` removes that contention point entirely: the only
//! cross-thread sharing left is the cursor and the result table, both
//! already lock-free.

use tablerace_core::CapacityError;

use crate::error::ProtocolError;
use crate::message::JobSpec;
use crate::scan::{run_scan, ScanOutcome, ScanStats};

/// The lifecycle state of a single worker's [`FilterProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// No job has ever been assigned.
    Uninitialized,
    /// A job is assigned and `start()` has not been called yet (or the
    /// previously assigned job finished and a new one may be assigned).
    Ready,
    /// `start()` is actively draining the cursor.
    Processing,
    /// `terminate()` has been called; this processor will not accept any
    /// further messages.
    Terminated,
}

/// Runs exactly one worker's share of a scan job through its lifecycle.
pub struct FilterProcessor {
    state: ProcessorState,
    job: Option<JobSpec>,
}

impl FilterProcessor {
    pub fn new() -> Self {
        Self { state: ProcessorState::Uninitialized, job: None }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Assigns a job. Valid from `Uninitialized` or `Ready` (a worker may
    /// be reused for a second scan once its first one's `Ready` state is
    /// reported back).
    pub fn initialize(&mut self, job: JobSpec) -> Result<(), ProtocolError> {
        match self.state {
            ProcessorState::Uninitialized | ProcessorState::Ready => {
                self.job = Some(job);
                self.state = ProcessorState::Ready;
                Ok(())
            }
            other => Err(ProtocolError { state: other, message: "initialize() requires Uninitialized or Ready" }),
        }
    }

    /// Runs the scan loop to completion (until the shared cursor is
    /// exhausted), then returns to `Ready`. Valid only from `Ready`.
    pub fn start(&mut self, stats: Option<&ScanStats>) -> Result<ScanOutcome, ProtocolError> {
        if self.state != ProcessorState::Ready {
            return Err(ProtocolError { state: self.state, message: "start() requires Ready" });
        }
        let job = self.job.as_ref().expect("Ready state implies a job is assigned");
        self.state = ProcessorState::Processing;

        let outcome = run_scan(&job.source, &job.cursor, &job.filter, &job.writer, &job.result, job.row_batch_size, stats)
            .map_err(|capacity: CapacityError| {
                self.state = ProcessorState::Ready;
                ProtocolError { state: ProcessorState::Processing, message: capacity_message(capacity) }
            })?;

        self.state = ProcessorState::Ready;
        Ok(outcome)
    }

    /// Ends this processor's lifecycle. Valid from any state except
    /// `Terminated` itself.
    pub fn terminate(&mut self) -> Result<(), ProtocolError> {
        if self.state == ProcessorState::Terminated {
            return Err(ProtocolError { state: self.state, message: "already terminated" });
        }
        self.job = None;
        self.state = ProcessorState::Terminated;
        Ok(())
    }
}

impl Default for FilterProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn capacity_message(_capacity: CapacityError) -> &'static str {
    "result table capacity exceeded mid-scan"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablerace_core::{ColumnDescriptor, ColumnType, Table};
    use tablerace_filter::{compile, compile_writer, FilterExpression, Mode};
    use std::sync::Arc;

    fn job() -> JobSpec {
        let columns = vec![ColumnDescriptor::new("id", ColumnType::Uint32)];
        let source = Table::empty_from_columns(&columns, 4).unwrap();
        let result = Table::empty_from_columns(&columns, 4).unwrap();
        let expr = FilterExpression::new(Mode::Dnf, vec![]);
        let filter = compile(&expr, source.header()).unwrap();
        let result_desc = tablerace_filter::ResultDescription::new(vec![tablerace_filter::ResultEntry::column("id")]);
        let writer = compile_writer(&result_desc, source.header(), result.header()).unwrap();
        JobSpec {
            source,
            result,
            cursor: crate::cursor::ScanCursor::new(),
            filter: Arc::new(filter),
            writer: Arc::new(writer),
            row_batch_size: 8,
        }
    }

    #[test]
    fn lifecycle_follows_uninitialized_ready_processing_ready_terminated() {
        let mut processor = FilterProcessor::new();
        assert_eq!(processor.state(), ProcessorState::Uninitialized);

        processor.initialize(job()).unwrap();
        assert_eq!(processor.state(), ProcessorState::Ready);

        processor.start(None).unwrap();
        assert_eq!(processor.state(), ProcessorState::Ready);

        processor.terminate().unwrap();
        assert_eq!(processor.state(), ProcessorState::Terminated);
    }

    #[test]
    fn start_before_initialize_is_a_protocol_error() {
        let mut processor = FilterProcessor::new();
        let err = processor.start(None).unwrap_err();
        assert_eq!(err.state, ProcessorState::Uninitialized);
    }

    #[test]
    fn terminate_twice_is_a_protocol_error() {
        let mut processor = FilterProcessor::new();
        processor.terminate().unwrap();
        assert!(processor.terminate().is_err());
    }
}

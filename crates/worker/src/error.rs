//! Errors owned by `tablerace-worker`.

use thiserror::Error;

use tablerace_core::CapacityError;

/// Raised when a worker receives a message its current
/// [`ProcessorState`](crate::processor::ProcessorState) does not accept.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected message in state {state:?}: {message}")]
pub struct ProtocolError {
    pub state: crate::processor::ProcessorState,
    pub message: &'static str,
}

/// The umbrella error a worker thread can report back to its coordinator.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("result table is full: {0}")]
    ResultCapacity(#[from] CapacityError),
    #[error("worker thread's channel disconnected")]
    Disconnected,
}

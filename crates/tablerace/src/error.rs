//! The coordinator's umbrella error type.

use thiserror::Error;

use tablerace_core::CapacityError;
use tablerace_filter::SchemaError;
use tablerace_worker::WorkerError;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build the source or result table: {0}")]
    Table(#[from] tablerace_core::TableError),
    #[error("filter or result description does not match the table schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("result table ran out of capacity: {0}")]
    Capacity(#[from] CapacityError),
    #[error("a worker thread reported an error: {0}")]
    Worker(#[from] WorkerError),
}

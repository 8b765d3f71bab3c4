//! Worker thread protocol and the batched parallel scan loop.
//!
//! A scan job is described once (a [`message::JobSpec`]), handed to every
//! worker thread, and each worker races the others over a shared
//! [`cursor::ScanCursor`] until the source table's rows are exhausted,
//! appending matches to a shared result [`tablerace_core::Table`].

pub mod cursor;
pub mod error;
pub mod message;
pub mod processor;
pub mod scan;
pub mod worker;

pub use cursor::ScanCursor;
pub use error::{ProtocolError, WorkerError};
pub use message::{InboundMessage, JobSpec, OutboundMessage};
pub use processor::{FilterProcessor, ProcessorState};
pub use scan::{run_scan, ScanOutcome, ScanStats};
pub use worker::WorkerHandle;

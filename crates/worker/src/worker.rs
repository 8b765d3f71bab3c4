//! Spawns a worker thread and exposes a channel-based handle to it.
//!
//! Adapted from the teacher's `util/jobs.rs` `JobThread` pattern: there,
//! each job thread is an async task parked on a `tokio::sync::mpsc`
//! receiver; here, each worker is a plain OS thread parked on a
//! `crossbeam_channel::Receiver`, since a scan worker's job is a tight
//! CPU-bound loop with no await points.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, RecvError, SendError, Sender};
use tracing::{debug, instrument, warn};

use crate::error::WorkerError;
use crate::message::{InboundMessage, OutboundMessage};
use crate::processor::FilterProcessor;
use crate::scan::ScanStats;

/// A live handle to a worker's thread and its two channel endpoints.
pub struct WorkerHandle {
    inbox: Sender<InboundMessage>,
    outbox: Receiver<OutboundMessage>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawns a new worker thread named `name`. `stats`, if given, is
    /// shared with every job this worker runs, so progress counters stay
    /// visible to the coordinator while a scan is in flight.
    #[instrument(level = "trace", skip(stats))]
    pub fn spawn(name: impl Into<String> + std::fmt::Debug, stats: Option<Arc<ScanStats>>) -> Self {
        let name = name.into();
        let (in_tx, in_rx) = bounded(1);
        let (out_tx, out_rx) = bounded(1);
        let thread_name = name.clone();
        let thread = thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker_loop(in_rx, out_tx, stats))
            .expect("failed to spawn worker thread");
        Self { inbox: in_tx, outbox: out_rx, thread: Some(thread) }
    }

    pub fn send(&self, message: InboundMessage) -> Result<(), WorkerError> {
        self.inbox.send(message).map_err(|SendError(_)| WorkerError::Disconnected)
    }

    pub fn recv(&self) -> Result<OutboundMessage, WorkerError> {
        self.outbox.recv().map_err(|RecvError| WorkerError::Disconnected)
    }

    /// Sends `Terminate` and blocks until the worker thread exits.
    pub fn shutdown(mut self) {
        let _ = self.send(InboundMessage::Terminate);
        while let Ok(message) = self.recv() {
            if matches!(message, OutboundMessage::Terminated) {
                break;
            }
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(inbox: Receiver<InboundMessage>, outbox: Sender<OutboundMessage>, stats: Option<Arc<ScanStats>>) {
    let mut processor = FilterProcessor::new();
    for message in inbox.iter() {
        match message {
            InboundMessage::Initialize(job) => match processor.initialize(job) {
                Ok(()) => {
                    let _ = outbox.send(OutboundMessage::Ready);
                }
                Err(err) => {
                    warn!(?err, "rejected Initialize");
                    let _ = outbox.send(OutboundMessage::Error(err.into()));
                }
            },
            InboundMessage::Start => match processor.start(stats.as_deref()) {
                Ok(outcome) => {
                    debug!(?outcome, "job complete");
                    let _ = outbox.send(OutboundMessage::JobComplete(outcome));
                }
                Err(err) => {
                    warn!(?err, "rejected Start");
                    let _ = outbox.send(OutboundMessage::Error(err.into()));
                }
            },
            InboundMessage::Terminate => {
                let _ = processor.terminate();
                let _ = outbox.send(OutboundMessage::Terminated);
                break;
            }
        }
    }
}

//! `tablerace`: a columnar, binary, in-memory table engine with a
//! parallel filter executor.
//!
//! - [`tablerace_core`] owns the byte layout: [`tablerace_core::Table`],
//!   its [`tablerace_core::Header`], and zero-copy row cursors.
//! - [`tablerace_filter`] compiles a [`tablerace_filter::FilterExpression`]
//!   and a [`tablerace_filter::ResultDescription`] into plain-data
//!   predicate and write-op trees.
//! - [`tablerace_worker`] runs the batched, cursor-claiming scan loop on a
//!   pool of worker threads.
//!
//! This crate wires the three together: [`coordinator::run`] is the single
//! entry point a caller needs.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use coordinator::{run, ScanResult};
pub use error::ScanError;

pub use tablerace_core as core;
pub use tablerace_filter as filter;
pub use tablerace_worker as worker;

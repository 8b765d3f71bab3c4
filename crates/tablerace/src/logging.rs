//! Process-wide tracing subscriber setup for binaries embedding this
//! crate. Library code never calls this itself — only `tracing::*!` macros
//! — so tests and downstream consumers can install their own subscriber
//! instead.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` `fmt` layer reading its filter from
/// `TABLERACE_LOG` (falling back to `info`). Call this once, near the top
/// of `main`.
pub fn init() {
    let filter = EnvFilter::try_from_env("TABLERACE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

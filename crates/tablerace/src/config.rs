//! Scan configuration: how many rows each worker claims per batch, how
//! many worker threads to run, and whether to pay for live progress
//! counters.

/// Tunables for [`crate::coordinator::run`].
///
/// Build one with [`ScanConfig::builder`], or just use
/// [`ScanConfig::default`].
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    row_batch_size: u32,
    worker_count: usize,
    collect_stats: bool,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// How many rows a worker claims from the shared cursor per fetch-add.
    pub fn row_batch_size(&self) -> u32 {
        self.row_batch_size
    }

    /// How many worker threads to spawn for a scan.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Whether to share a [`tablerace_worker::ScanStats`] across workers
    /// for live progress.
    pub fn collect_stats(&self) -> bool {
        self.collect_stats
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            row_batch_size: 256,
            worker_count: num_cpus::get().max(1),
            collect_stats: false,
        }
    }
}

/// A builder for [`ScanConfig`]. Unset fields fall back to
/// [`ScanConfig::default`]'s values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanConfigBuilder {
    row_batch_size: Option<u32>,
    worker_count: Option<usize>,
    collect_stats: Option<bool>,
}

impl ScanConfigBuilder {
    pub fn row_batch_size(mut self, row_batch_size: u32) -> Self {
        self.row_batch_size = Some(row_batch_size);
        self
    }

    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = Some(worker_count);
        self
    }

    pub fn collect_stats(mut self, collect_stats: bool) -> Self {
        self.collect_stats = Some(collect_stats);
        self
    }

    pub fn build(self) -> ScanConfig {
        let default = ScanConfig::default();
        ScanConfig {
            row_batch_size: self.row_batch_size.unwrap_or(default.row_batch_size),
            worker_count: self.worker_count.unwrap_or(default.worker_count),
            collect_stats: self.collect_stats.unwrap_or(default.collect_stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_fall_back_to_defaults() {
        let config = ScanConfig::builder().row_batch_size(64).build();
        assert_eq!(config.row_batch_size(), 64);
        assert_eq!(config.worker_count(), ScanConfig::default().worker_count());
        assert!(!config.collect_stats());
    }
}

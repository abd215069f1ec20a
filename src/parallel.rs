//! Worker-pool configuration
//!
//! [`ParallelConfig`] decides how many rayon threads the process runs with and
//! how many workers a chunked computation over `n` samples is split into. The
//! command-line tool builds one from `--threads` (all cores when absent) and
//! installs it as the global pool before any statistics run.

use crate::errors::{CubeStatError, Result};
use crate::statistics::summation;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

/// Thread count for the global pool and for chunked summation
///
/// `num_threads == None` defers to whatever pool is already current.
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// One thread per logical core, as reported by `num_cpus`
    pub fn all_cores() -> Self {
        Self::with_threads(num_cpus::get())
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Defer to the current rayon pool
    pub fn new_default() -> Self {
        Self { num_threads: None }
    }

    /// Install the configured thread count as rayon's global pool
    ///
    /// Without a thread count the existing (or lazily created) pool is used.
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::ThreadPool`] if the global pool was already
    /// built or cannot be created.
    pub fn setup_global_pool(&self) -> Result<()> {
        let Some(requested) = self.num_threads else {
            debug!(
                threads = self.current_threads(),
                "keeping current thread pool"
            );
            return Ok(());
        };

        ThreadPoolBuilder::new()
            .num_threads(requested)
            .build_global()
            .map_err(|e| {
                CubeStatError::ThreadPool(format!(
                    "Failed to initialize thread pool with {requested} threads: {e}"
                ))
            })?;

        info!(
            requested,
            threads = self.current_threads(),
            "configured global thread pool"
        );
        Ok(())
    }

    /// Threads in the pool the caller is currently running on
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }

    /// Number of workers to use for `n` samples
    ///
    /// The configured thread count (or the current pool size) capped by `n`;
    /// an empty input still gets one worker.
    pub fn worker_count(&self, n: usize) -> usize {
        let available = self.num_threads.unwrap_or_else(|| self.current_threads());
        summation::worker_count(n, available)
    }
}

/// Snapshot of the host and the current pool
pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        current_threads: rayon::current_num_threads(),
        available_cores: num_cpus::get(),
        available_parallelism: std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
    }
}

#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
    pub available_parallelism: usize,
}

impl ParallelInfo {
    pub fn log_info(&self) {
        info!(
            current_threads = self.current_threads,
            available_cores = self.available_cores,
            available_parallelism = self.available_parallelism,
            "parallel environment"
        );
    }
}

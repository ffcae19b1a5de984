//! Hub Configuration - Worker count, sweep cadence and retry policy
//!
//! The worker count bounds how many threads a sweep fans out over. The sweep
//! interval gates [`Hub::sweep_if_due`](crate::Hub::sweep_if_due). Conflict
//! retries bound how often a transition is re-run after losing a
//! compare-and-set race.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time between periodic sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for Hub execution
///
/// # Example
///
/// ```
/// use petworld_hub::HubConfig;
///
/// // Single worker (default)
/// let config = HubConfig::default();
/// assert!(config.is_single_worker());
/// assert_eq!(config.conflict_retries(), 1);
///
/// // Configure for 4 workers (clamped to available cores)
/// let config = HubConfig::with_worker_count(4);
/// assert_eq!(config.worker_count(), 4.min(petworld_hub::max_workers()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Number of sweep worker threads, clamped to `[1, max_workers()]`
    worker_count: usize,
    /// Minimum time between two periodic sweeps
    sweep_interval: Duration,
    /// How many times a conflicting transition is re-run
    conflict_retries: u32,
}

impl HubConfig {
    /// Create a new configuration with the specified worker count
    ///
    /// The worker count is clamped to `[1, max_workers()]`.
    pub fn with_worker_count(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.clamp(1, max_workers()),
            ..Self::default()
        }
    }

    /// Get the current worker count
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Set the number of worker threads
    ///
    /// The value is clamped to `[1, max_workers()]`.
    ///
    /// # Example
    ///
    /// ```
    /// use petworld_hub::HubConfig;
    ///
    /// let mut config = HubConfig::default();
    /// config.set_worker_count(0);
    /// assert_eq!(config.worker_count(), 1);
    /// ```
    pub fn set_worker_count(&mut self, n: usize) {
        self.worker_count = n.clamp(1, max_workers());
    }

    /// Check if sweeps run on the calling thread only
    pub fn is_single_worker(&self) -> bool {
        self.worker_count == 1
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Set the minimum time between periodic sweeps
    pub fn set_sweep_interval(&mut self, interval: Duration) {
        self.sweep_interval = interval;
    }

    /// Builder form of [`set_sweep_interval`](Self::set_sweep_interval)
    pub fn sweep_every(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn conflict_retries(&self) -> u32 {
        self.conflict_retries
    }

    /// Set how many times a conflicting transition is re-run (0 = never)
    pub fn set_conflict_retries(&mut self, retries: u32) {
        self.conflict_retries = retries;
    }
}

impl Default for HubConfig {
    /// Single worker, five-minute sweeps, one conflict retry
    fn default() -> Self {
        Self {
            worker_count: 1,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            conflict_retries: 1,
        }
    }
}

/// Get the maximum worker count on this system
///
/// This uses the `num_cpus` crate to detect the number of logical CPUs.
pub fn max_workers() -> usize {
    num_cpus::get()
}

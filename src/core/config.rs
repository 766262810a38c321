//! # Worker configuration.
//!
//! Provides [`WorkerConfig`] the settings a [`Worker`](crate::Worker) runs with.
//!
//! ## Sentinel values
//! - `jobs_limit = 0` → [`DEFAULT_JOBS_LIMIT`]
//! - `run_delay = 0s` → start dispatching immediately
//! - `shutdown_poll_interval = 0s` → [`DEFAULT_SHUTDOWN_POLL_INTERVAL`]
//! - any `delays` field `= 0s` → no wait for that outcome

use std::fmt;
use std::time::Duration;

use crate::middleware::MiddlewareRef;
use crate::policies::Delays;

/// Concurrency limit used when none (or zero) is configured.
pub const DEFAULT_JOBS_LIMIT: usize = 1;

/// Shutdown poll interval used when none (or zero) is configured.
pub const DEFAULT_SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Settings for one worker.
///
/// ## Field semantics
/// - `jobs_limit`: maximum number of jobs executing at once
/// - `run_delay`: wait before the first dispatch of every run
/// - `delays`: per-outcome wait before a finished job frees its slot
/// - `shutdown_poll_interval`: progress tick while `shutdown` waits for the loop
/// - `middlewares`: wrappers applied around the job, index 0 outermost
///
/// All fields are public; prefer the helper accessors over checking the
/// `0` sentinels by hand.
#[derive(Clone)]
pub struct WorkerConfig {
    /// Maximum number of concurrently executing jobs (`0` = default of 1).
    pub jobs_limit: usize,

    /// Delay before the loop dispatches its first job.
    ///
    /// Cut short if the worker is shut down while waiting.
    pub run_delay: Duration,

    /// Post-job delays keyed by outcome.
    pub delays: Delays,

    /// How often `shutdown` ticks while waiting for the loop to finish.
    pub shutdown_poll_interval: Duration,

    /// Middlewares wrapped around the job on every run, first = outermost.
    pub middlewares: Vec<MiddlewareRef>,
}

impl WorkerConfig {
    /// Returns the concurrency limit, never less than 1.
    #[inline]
    pub fn jobs_limit_clamped(&self) -> usize {
        if self.jobs_limit == 0 {
            DEFAULT_JOBS_LIMIT
        } else {
            self.jobs_limit
        }
    }

    /// Returns the startup delay as an `Option`.
    ///
    /// - `None` → dispatch immediately
    /// - `Some(d)` → wait `d` first
    #[inline]
    pub fn startup_delay(&self) -> Option<Duration> {
        if self.run_delay.is_zero() {
            None
        } else {
            Some(self.run_delay)
        }
    }

    /// Returns the shutdown poll interval, substituting the default for zero.
    #[inline]
    pub fn shutdown_poll_interval_clamped(&self) -> Duration {
        if self.shutdown_poll_interval.is_zero() {
            DEFAULT_SHUTDOWN_POLL_INTERVAL
        } else {
            self.shutdown_poll_interval
        }
    }
}

impl Default for WorkerConfig {
    /// Default configuration:
    ///
    /// - `jobs_limit = 1`
    /// - `run_delay = 0s`
    /// - `delays` all zero
    /// - `shutdown_poll_interval = 500ms`
    /// - no middlewares
    fn default() -> Self {
        Self {
            jobs_limit: DEFAULT_JOBS_LIMIT,
            run_delay: Duration::ZERO,
            delays: Delays::default(),
            shutdown_poll_interval: DEFAULT_SHUTDOWN_POLL_INTERVAL,
            middlewares: Vec::new(),
        }
    }
}

impl fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerConfig")
            .field("jobs_limit", &self.jobs_limit)
            .field("run_delay", &self.run_delay)
            .field("delays", &self.delays)
            .field("shutdown_poll_interval", &self.shutdown_poll_interval)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for observing the worker lifecycle.
//! Both hooks default to no-ops, so an implementation only overrides what it
//! cares about.

use crate::error::WorkerError;

/// Result of a `run` or `shutdown` attempt as seen by subscribers.
pub type Outcome<'a> = Result<(), &'a WorkerError>;

/// Contract for lifecycle subscribers.
///
/// Called in-line from `Worker::run` / `Worker::shutdown`; keep it quick.
pub trait Subscribe: Send + Sync + 'static {
    /// Called after every `run` attempt.
    fn on_run(&self, outcome: Outcome<'_>) {
        let _ = outcome;
    }

    /// Called after every `shutdown` attempt.
    fn on_shutdown(&self, outcome: Outcome<'_>) {
        let _ = outcome;
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

//! # Job abstraction.
//!
//! A [`Job`] is invoked once per dispatch with a fresh [`State`]. The worker
//! calls it again and again until shutdown, so implementations hold no
//! per-invocation state of their own; share anything long-lived through `Arc`.
//!
//! Jobs should watch `state.context()` and return promptly once it is done:
//! the context is cancelled when the worker is asked to stop and may carry a
//! deadline set by [`JobTtl`](crate::JobTtl).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::JobError;
use crate::state::State;

/// Boxed future returned by [`Job::run`].
pub type BoxJobFuture = Pin<Box<dyn Future<Output = Result<(), JobError>> + Send + 'static>>;

/// Shared handle to a job.
pub type JobRef = Arc<dyn Job>;

/// # One unit of work.
///
/// # Example
/// ```
/// use jobvisor::{BoxJobFuture, Job, JobError, State};
///
/// struct Poll;
///
/// impl Job for Poll {
///     fn run(&self, state: State) -> BoxJobFuture {
///         Box::pin(async move {
///             if state.context().is_done() {
///                 return Err(JobError::Closed);
///             }
///             // fetch and process one batch...
///             Err(JobError::Idle)
///         })
///     }
/// }
/// ```
pub trait Job: Send + Sync + 'static {
    /// Starts one invocation.
    ///
    /// The returned future owns everything it needs (`'static`) so the worker
    /// can drive it on its own task.
    fn run(&self, state: State) -> BoxJobFuture;
}

//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(State) -> Fut`, producing a fresh future
//! per invocation. No hidden mutation between invocations; if the job needs
//! shared state, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use jobvisor::{JobError, JobFn, JobRef, State};
//!
//! let job: JobRef = JobFn::arc(|state: State| async move {
//!     if state.context().is_done() {
//!         return Err(JobError::Closed);
//!     }
//!     Ok::<(), JobError>(())
//! });
//! # let _ = job;
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::JobError;
use crate::jobs::job::{BoxJobFuture, Job};
use crate::state::State;

/// Function-backed job implementation.
#[derive(Debug)]
pub struct JobFn<F> {
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new function-backed job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`](crate::JobRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the job and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Job for JobFn<F>
where
    F: Fn(State) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn run(&self, state: State) -> BoxJobFuture {
        Box::pin((self.f)(state))
    }
}

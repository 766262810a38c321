//! # Per-job time-to-live.
//!
//! [`JobTtl`] narrows the state's context with a deadline of `now + ttl` and
//! runs the rest of the chain on its own Tokio task, then races three
//! outcomes:
//!
//! ```text
//! ┌─ inner returns ────────► its result
//! ├─ inner panics ─────────► panic re-raised here (not swallowed)
//! └─ context done first ───► Err(DeadlineExceeded | Canceled), immediately
//! ```
//!
//! ## Cancellation is cooperative only
//! When the deadline wins, `JobTtl` **stops waiting**; it does not stop the
//! job. The inner task keeps running in the background until it returns on
//! its own, its result is discarded, and any resources it holds stay held
//! until then. Jobs that must not overrun should watch
//! `state.context().done()` and bail out.
//!
//! A zero TTL makes the middleware a pass-through.

use std::sync::Arc;
use std::time::Duration;

use crate::error::JobError;
use crate::jobs::{JobFn, JobRef};
use crate::middleware::Middleware;
use crate::state::State;

/// Middleware bounding how long the caller waits for a job.
#[derive(Clone, Copy, Debug)]
pub struct JobTtl {
    ttl: Duration,
}

impl JobTtl {
    /// Creates the middleware; `Duration::ZERO` disables it.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Middleware for JobTtl {
    fn wrap(&self, next: JobRef) -> JobRef {
        if self.ttl.is_zero() {
            return next;
        }
        let ttl = self.ttl;

        JobFn::arc(move |state: State| {
            let next = Arc::clone(&next);
            async move {
                let ctx = state.context().with_timeout(ttl);
                let inner = state.with_context(ctx.clone());
                let mut handle = tokio::spawn(async move { next.run(inner).await });

                tokio::select! {
                    joined = &mut handle => match joined {
                        Ok(res) => res,
                        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                        Err(_) => Err(JobError::Canceled),
                    },
                    reason = ctx.done() => Err(reason.into()),
                }
            }
        })
    }
}

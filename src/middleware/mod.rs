//! # Middleware pipeline.
//!
//! A [`Middleware`] takes the next [`Job`](crate::Job) in the chain and returns
//! a job that wraps it. [`chain`] folds a list of middlewares around a base
//! job so that **index 0 is outermost**: it sees the invocation first and the
//! result last.
//!
//! ```text
//! chain(J, [A, B])  ==  A(B(J))
//!
//! invoke ─► A enter ─► B enter ─► J ─► B exit ─► A exit ─► result
//! ```
//!
//! ## Built-ins
//! | Middleware      | Effect                                                          |
//! |-----------------|-----------------------------------------------------------------|
//! | [`Recover`]     | turns a panic into [`JobError::Panic`](crate::JobError::Panic)  |
//! | [`JobTtl`]      | stops waiting for the job after a deadline                      |
//! | [`AssignJobId`] | attaches a fresh [`JobId`] to the state's context               |
//! | [`LogErrors`]   | logs non-sentinel job errors via `tracing`                      |
//!
//! Middlewares listed before [`Recover`] see a contained panic as an error;
//! those listed after it (and the job) are the ones it protects.
//!
//! ## Custom middleware
//! Any `Fn(JobRef) -> JobRef` is a middleware:
//! ```rust
//! use std::sync::Arc;
//! use jobvisor::{JobFn, JobRef, MiddlewareRef, State};
//!
//! let trace: MiddlewareRef = Arc::new(|next: JobRef| -> JobRef {
//!     JobFn::arc(move |state: State| {
//!         let next = Arc::clone(&next);
//!         async move {
//!             let res = next.run(state).await;
//!             println!("job finished: {res:?}");
//!             res
//!         }
//!     })
//! });
//! # let _ = trace;
//! ```

mod job_id;
mod log;
mod recover;
mod ttl;

use std::sync::Arc;

use crate::jobs::JobRef;

pub use job_id::{AssignJobId, JobId};
pub use log::LogErrors;
pub use recover::Recover;
pub(crate) use recover::panic_message;
pub use ttl::JobTtl;

/// Wraps a job with cross-cutting behaviour.
pub trait Middleware: Send + Sync + 'static {
    /// Returns a job that runs `next` inside this middleware.
    fn wrap(&self, next: JobRef) -> JobRef;
}

impl<F> Middleware for F
where
    F: Fn(JobRef) -> JobRef + Send + Sync + 'static,
{
    fn wrap(&self, next: JobRef) -> JobRef {
        self(next)
    }
}

/// Shared handle to a middleware.
pub type MiddlewareRef = Arc<dyn Middleware>;

/// Composes `middlewares` around `job`, first element outermost.
pub fn chain(job: JobRef, middlewares: &[MiddlewareRef]) -> JobRef {
    middlewares
        .iter()
        .rev()
        .fold(job, |next, middleware| middleware.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::error::JobError;
    use crate::jobs::JobFn;
    use crate::state::State;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, trace: Trace) -> MiddlewareRef {
        Arc::new(move |next: JobRef| -> JobRef {
            let trace = Arc::clone(&trace);
            JobFn::arc(move |state: State| {
                let next = Arc::clone(&next);
                let trace = Arc::clone(&trace);
                async move {
                    trace.lock().unwrap().push(format!("{name}-enter"));
                    let res = next.run(state).await;
                    trace.lock().unwrap().push(format!("{name}-exit"));
                    res
                }
            })
        })
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let trace: Trace = Arc::default();
        let job_trace = Arc::clone(&trace);
        let job: JobRef = JobFn::arc(move |_state: State| {
            let trace = Arc::clone(&job_trace);
            async move {
                trace.lock().unwrap().push("job".to_string());
                Ok::<(), JobError>(())
            }
        });

        let wrapped = chain(
            job,
            &[
                recording("a", Arc::clone(&trace)),
                recording("b", Arc::clone(&trace)),
            ],
        );
        assert_eq!(wrapped.run(State::default()).await, Ok(()));

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["a-enter", "b-enter", "job", "b-exit", "a-exit"]
        );
    }

    #[tokio::test]
    async fn empty_chain_is_the_job_itself() {
        let job: JobRef = JobFn::arc(|_state: State| async { Err(JobError::Idle) });
        let wrapped = chain(Arc::clone(&job), &[]);

        assert!(Arc::ptr_eq(&job, &wrapped));
        assert_eq!(wrapped.run(State::default()).await, Err(JobError::Idle));
    }
}

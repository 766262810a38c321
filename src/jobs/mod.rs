//! # Job abstractions.
//!
//! This module provides the job-related types:
//! - [`Job`] - trait for one unit of work, invoked repeatedly by a worker
//! - [`JobFn`] - closure-backed job implementation
//! - [`JobRef`] - shared reference to a job (`Arc<dyn Job>`)
//! - [`BoxJobFuture`] - the future a job invocation returns

mod job;
mod job_fn;

pub use job::{BoxJobFuture, Job, JobRef};
pub use job_fn::JobFn;

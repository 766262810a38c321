//! # jobvisor
//!
//! **Jobvisor** runs one job function over and over, at most `N` executions
//! at a time, until it is asked to stop.
//!
//! It is meant for background pollers, queue consumers and similar
//! "keep doing this" loops inside a Tokio application. Cross-cutting
//! behaviour (panic containment, per-job deadlines, logging, identifiers)
//! is layered on with middleware; pacing comes from per-outcome delays.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            ┌──────────────┐
//!            │   JobRef     │  user job
//!            └──────┬───────┘
//!                   ▼
//!     ┌───────────────────────────┐
//!     │  middleware::chain        │  Recover, JobTtl, AssignJobId, LogErrors, ...
//!     └─────────────┬─────────────┘
//!                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Worker (start/stop controller)                                   │
//! │  - single active run (AlreadyRunning / Closed)                    │
//! │  - closed / done signals (CancellationToken)                      │
//! │  - Events (fans run/shutdown outcomes out to subscribers)         │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  LoopDriver (own task)                                            │
//! │  - slot pool: Semaphore(jobs_limit)                               │
//! │  - one task per execution, tracked in a JoinSet                   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  execution   │   │  execution   │   │  execution   │
//!     │ job + delay  │   │ job + delay  │   │ job + delay  │
//!     └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Worker::run() ──► driver::spawn() ──► LoopDriver::run()
//!
//! loop {
//!   ├─► closed? ─► exit
//!   ├─► acquire slot (cancellable)
//!   ├─► spawn execution(seq)
//!   │       ├─► job.run(State { ctx: stop-aware, seq })
//!   │       ├─► delay = Delays::after(result)   success / error / idle
//!   │       ├─► sleep(delay) (cut short by shutdown)
//!   │       └─► release slot
//!   └─► continue
//! }
//!
//! Worker::shutdown(ctx) ──► closed.cancel() ──► wait for done or ctx deadline
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Worker**        | Start/stop a bounded, repeating job loop.                    | [`Worker`], [`WorkerBuilder`], [`Lifecycle`] |
//! | **Groups**        | Start/stop several workers in order.                         | [`WorkerGroup`]                             |
//! | **Jobs**          | Define jobs as closures or trait objects.                    | [`Job`], [`JobFn`], [`JobRef`]              |
//! | **Middleware**    | Wrap jobs with cross-cutting behaviour.                      | [`Middleware`], [`Recover`], [`JobTtl`]     |
//! | **State**         | Per-job context with cancellation, deadline, scoped values.  | [`State`], [`Context`], [`JobId`]           |
//! | **Pacing**        | Delay after success, error and idle results.                 | [`Delays`]                                  |
//! | **Subscribers**   | Observe run/shutdown outcomes.                               | [`Subscribe`], [`Events`], [`LogWriter`]    |
//! | **Errors**        | Typed errors for the lifecycle and for jobs.                 | [`WorkerError`], [`JobError`]               |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use jobvisor::{JobError, JobFn, JobTtl, Recover, State, Worker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let job = JobFn::arc(|state: State| async move {
//!         if state.context().is_done() {
//!             return Err(JobError::Closed);
//!         }
//!         println!("hello from job #{}", state.seq());
//!         Ok::<(), JobError>(())
//!     });
//!
//!     let worker = Worker::builder(job)
//!         .jobs_limit(2)
//!         .success_delay(Duration::from_millis(50))
//!         .middleware(Recover)
//!         .middleware(JobTtl::new(Duration::from_secs(1)))
//!         .with_logging()
//!         .build();
//!
//!     worker.run()?;
//!     tokio::time::sleep(Duration::from_millis(200)).await;
//!     worker.shutdown_timeout(Duration::from_secs(1)).await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod jobs;
mod middleware;
mod policies;
mod state;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    DEFAULT_JOBS_LIMIT, DEFAULT_SHUTDOWN_POLL_INTERVAL, Lifecycle, Worker, WorkerBuilder,
    WorkerConfig, WorkerGroup,
};
pub use error::{ContextError, JobError, WorkerError};
pub use jobs::{BoxJobFuture, Job, JobFn, JobRef};
pub use middleware::{
    AssignJobId, JobId, JobTtl, LogErrors, Middleware, MiddlewareRef, Recover, chain,
};
pub use policies::Delays;
pub use state::{Context, State};
pub use subscribers::{Events, LogWriter, Outcome, Subscribe};

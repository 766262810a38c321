//! Worker core: lifecycle, loop driver, job execution.
//!
//! This module contains the worker runtime. The public API from this module
//! is [`Worker`] (with [`WorkerBuilder`] and [`WorkerConfig`]), the
//! [`Lifecycle`] trait and [`WorkerGroup`].
//!
//! Internal modules:
//! - [`worker`]: start/stop controller, single-active-run invariant, shutdown polling;
//! - [`driver`]: dispatch loop bounded by the slot semaphore;
//! - [`runner`]: one job execution plus its post-job delay;
//! - [`group`]: sequential composition of several lifecycles;
//! - [`builder`], [`config`]: worker construction and settings.
//!
//! ## Wiring
//! ```text
//! Worker::run()
//!   ├─► lock ─► done still open? ─► Err(AlreadyRunning)
//!   ├─► closed = CancellationToken::new()
//!   ├─► job = middleware::chain(job, cfg.middlewares)
//!   ├─► done = driver::spawn(job, cfg, closed)
//!   └─► unlock ─► Events::emit_run
//!
//! LoopDriver (own task)
//!   ├─► startup delay (cut short by `closed`)
//!   └─► loop {
//!         closed? ─► exit
//!         acquire slot (races `closed`)
//!         JoinSet::spawn(runner::execute(job, permit, seq))
//!       }
//!       drain JoinSet ─► done.cancel()
//!
//! Worker::shutdown(ctx)
//!   ├─► lock ─► closed.cancel() ─► unlock
//!   └─► select! { done, ctx.done(), poll tick } ─► Events::emit_shutdown
//! ```

mod builder;
mod config;
mod driver;
mod group;
mod lifecycle;
mod runner;
mod worker;

pub use builder::WorkerBuilder;
pub use config::{DEFAULT_JOBS_LIMIT, DEFAULT_SHUTDOWN_POLL_INTERVAL, WorkerConfig};
pub use group::WorkerGroup;
pub use lifecycle::Lifecycle;
pub use worker::Worker;

//! # Lifecycle subscribers.
//!
//! The worker reports two things to the outside world: the outcome of every
//! `run` attempt and the outcome of every `shutdown` attempt. Both are
//! delivered synchronously to each registered [`Subscribe`] implementation,
//! in registration order, **after** the worker has released its internal lock.
//!
//! ## Architecture
//! ```text
//! Worker::run()      ── outcome ──► Events::emit_run()      ─┬─► sub1.on_run()
//!                                                            ├─► sub2.on_run()
//!                                                            └─► ...
//! Worker::shutdown() ── outcome ──► Events::emit_shutdown() ─┬─► sub1.on_shutdown()
//!                                                            └─► ...
//! ```
//!
//! ## Rules
//! - Every attempt is reported, successful or not.
//! - Delivery is in-line on the caller's task: a slow subscriber slows the
//!   caller, a panicking subscriber panics the caller.
//! - Registration happens while building the worker; the set is fixed afterwards.
//!
//! ## Implementing custom subscribers
//! ```rust
//! use jobvisor::{Subscribe, WorkerError};
//!
//! struct Audit;
//!
//! impl Subscribe for Audit {
//!     fn on_shutdown(&self, outcome: Result<(), &WorkerError>) {
//!         if let Err(err) = outcome {
//!             eprintln!("shutdown failed: {}", err.as_label());
//!         }
//!     }
//! }
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::Events;
pub use subscribe::{Outcome, Subscribe};

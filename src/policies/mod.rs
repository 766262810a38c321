//! Post-job delay policy.
//!
//! This module holds the knob that controls **how long** a job keeps its slot
//! after it returns, depending on the outcome.
//!
//! ## Contents
//! - [`Delays`] maps a job result to a wait (success / error / idle)
//!
//! ## Quick wiring
//! ```text
//! WorkerConfig { delays: Delays, .. }
//!      └─► core::runner::execute uses:
//!           - delays.after(&result) to pick the wait
//!           - the stop signal to cut the wait short
//! ```
//!
//! ## Defaults
//! - All delays are zero: the slot is released as soon as the job returns.

mod delays;

pub use delays::Delays;

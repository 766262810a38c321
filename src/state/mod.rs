//! # Per-job execution state.
//!
//! Every job dispatch receives a fresh [`State`] carrying a [`Context`]. The
//! context bundles cooperative cancellation, an optional deadline and scoped
//! values (for example the [`JobId`](crate::JobId) attached by middleware).
//!
//! ## Contents
//! - [`Context`] immutable, cheaply cloneable scope; children derive from parents
//! - [`State`] carrier passed through the middleware chain into the job
//!
//! ## Derivation
//! ```text
//! Context::background()
//!   └─► with_cancel()        child token, cancelled with the parent
//!        └─► with_timeout()  deadline = min(parent deadline, now + ttl)
//!             └─► with_value(JobId)  overlay visible to this scope only
//! ```

mod context;
#[allow(clippy::module_inception)]
mod state;

pub use context::Context;
pub use state::State;

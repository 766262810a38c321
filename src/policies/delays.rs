//! # Outcome-based delays.
//!
//! [`Delays`] decides how long a finished job holds on to its slot before the
//! loop may dispatch into it again. It is the only throttle the worker has.
//!
//! | Job result            | Delay        |
//! |-----------------------|--------------|
//! | `Ok(())`              | `success`    |
//! | `Err(JobError::Idle)` | `idle`       |
//! | any other `Err`       | `error`      |
//!
//! Panics contained by [`Recover`](crate::Recover) arrive as errors and
//! therefore select `error`. A zero delay means "no wait".
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use jobvisor::{Delays, JobError};
//!
//! let delays = Delays {
//!     success: Duration::ZERO,
//!     error: Duration::from_secs(5),
//!     idle: Duration::from_secs(1),
//! };
//!
//! assert_eq!(delays.after(&Ok(())), Duration::ZERO);
//! assert_eq!(delays.after(&Err(JobError::Idle)), Duration::from_secs(1));
//! assert_eq!(delays.after(&Err(JobError::fail("boom"))), Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::error::JobError;

/// Per-outcome delay applied after each job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delays {
    /// Wait after a job returned `Ok(())`.
    pub success: Duration,
    /// Wait after a job returned an error other than [`JobError::Idle`].
    pub error: Duration,
    /// Wait after a job returned [`JobError::Idle`].
    pub idle: Duration,
}

impl Delays {
    /// Returns the delay matching `result`. Pure; no side effects.
    pub fn after(&self, result: &Result<(), JobError>) -> Duration {
        match result {
            Ok(()) => self.success,
            Err(JobError::Idle) => self.idle,
            Err(_) => self.error,
        }
    }
}

//! Error types used by the jobvisor worker and by jobs.
//!
//! This module defines three error enums:
//!
//! - [`WorkerError`]: errors raised by the worker lifecycle (`run` / `shutdown`).
//! - [`JobError`]: errors returned by individual job executions.
//! - [`ContextError`]: the reason a [`Context`](crate::Context) is done.
//!
//! `WorkerError` and `JobError` provide helper methods (`as_label`, `as_message`)
//! for logging/metrics.

use std::fmt::Display;

use thiserror::Error;

/// # Reason a context finished.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context (or one of its parents) was cancelled.
    #[error("context canceled")]
    Canceled,

    /// The context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// # Errors produced by the worker lifecycle.
///
/// Returned synchronously from [`Worker::run`](crate::Worker::run) and
/// [`Worker::shutdown`](crate::Worker::shutdown), and delivered to subscribers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// A run loop is already active; nothing was changed.
    #[error("worker already running")]
    AlreadyRunning,

    /// The worker was never started or is already stopping.
    #[error("worker is closed")]
    Closed,

    /// The shutdown context was cancelled before the loop finished.
    #[error("shutdown canceled")]
    Canceled,

    /// The shutdown deadline passed before the loop finished.
    #[error("shutdown deadline exceeded")]
    DeadlineExceeded,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::WorkerError;
    ///
    /// assert_eq!(WorkerError::AlreadyRunning.as_label(), "worker_already_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::AlreadyRunning => "worker_already_running",
            WorkerError::Closed => "worker_closed",
            WorkerError::Canceled => "worker_shutdown_canceled",
            WorkerError::DeadlineExceeded => "worker_shutdown_deadline_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::AlreadyRunning => "run rejected: loop still active".to_string(),
            WorkerError::Closed => "shutdown rejected: worker not running".to_string(),
            WorkerError::Canceled => "shutdown abandoned: context canceled".to_string(),
            WorkerError::DeadlineExceeded => {
                "shutdown abandoned: jobs still running at deadline".to_string()
            }
        }
    }
}

impl From<ContextError> for WorkerError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Canceled => WorkerError::Canceled,
            ContextError::DeadlineExceeded => WorkerError::DeadlineExceeded,
        }
    }
}

/// # Errors produced by job execution.
///
/// `Idle` and `Closed` are sentinels: a job returns them to say "there was
/// nothing to do" rather than "something broke". The worker picks the idle
/// delay for `Idle`; every other error selects the error delay.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// No work was available; the worker applies the idle delay.
    #[error("idle job")]
    Idle,

    /// The job observed that no new work will be accepted.
    #[error("worker is closed")]
    Closed,

    /// The job context was cancelled.
    #[error("job canceled")]
    Canceled,

    /// The job outlived its deadline.
    #[error("job deadline exceeded")]
    DeadlineExceeded,

    /// The job panicked and the panic was contained by [`Recover`](crate::Recover).
    #[error("job panicked: {message}\n{backtrace}")]
    Panic {
        /// Panic payload rendered as text.
        message: String,
        /// Backtrace captured where [`Recover`](crate::Recover) contained the
        /// panic. It shows the recovering call stack, not the frame that
        /// panicked; the panic site is in `message` only if the job put it there.
        backtrace: String,
    },

    /// The job failed.
    #[error("job failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl JobError {
    /// Builds a [`JobError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use jobvisor::JobError;
    ///
    /// let err = JobError::fail("connection refused");
    /// assert_eq!(err.to_string(), "job failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        JobError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Idle => "job_idle",
            JobError::Closed => "job_closed",
            JobError::Canceled => "job_canceled",
            JobError::DeadlineExceeded => "job_deadline_exceeded",
            JobError::Panic { .. } => "job_panic",
            JobError::Fail { .. } => "job_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    ///
    /// Unlike `Display`, the panic variant omits the backtrace.
    pub fn as_message(&self) -> String {
        match self {
            JobError::Panic { message, .. } => format!("panic: {message}"),
            JobError::Fail { error } => format!("error: {error}"),
            other => other.to_string(),
        }
    }

    /// True for the "nothing to do" sentinels (`Idle`, `Closed`).
    pub fn is_sentinel(&self) -> bool {
        matches!(self, JobError::Idle | JobError::Closed)
    }
}

impl From<ContextError> for JobError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Canceled => JobError::Canceled,
            ContextError::DeadlineExceeded => JobError::DeadlineExceeded,
        }
    }
}

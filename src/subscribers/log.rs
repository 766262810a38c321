//! # LogWriter: lifecycle logger
//!
//! A subscriber that writes worker lifecycle outcomes through `tracing`.
//!
//! ## Example output
//! ```text
//! INFO  worker running
//! ERROR worker run failed error="worker already running" label="worker_already_running"
//! INFO  worker stopped
//! ERROR worker stopped with error error="shutdown deadline exceeded" label="worker_shutdown_deadline_exceeded"
//! ```

use crate::subscribers::{Outcome, Subscribe};

/// Lifecycle logging subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_run(&self, outcome: Outcome<'_>) {
        match outcome {
            Ok(()) => tracing::info!("worker running"),
            Err(err) => tracing::error!(error = %err, label = err.as_label(), "worker run failed"),
        }
    }

    fn on_shutdown(&self, outcome: Outcome<'_>) {
        match outcome {
            Ok(()) => tracing::info!("worker stopped"),
            Err(err) => {
                tracing::error!(error = %err, label = err.as_label(), "worker stopped with error")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

//! # Example: helloworld
//!
//! Smallest useful worker: one job slot, a short pause after every success,
//! structured logs of the lifecycle.
//!
//! Demonstrates how to:
//! - Define a job with [`JobFn`].
//! - Configure pacing with [`WorkerBuilder`](jobvisor::WorkerBuilder).
//! - Tag every execution with a [`JobId`] and log it from a custom middleware.
//! - Stop the worker with a deadline.
//!
//! ## Flow
//! ```text
//! Worker::run()
//!     ├─► LogWriter: "worker running"
//!     └─► loop { AssignJobId ─► log_done ─► job ─► sleep(success_delay) }
//! Worker::shutdown_timeout(1s)
//!     └─► LogWriter: "worker stopped"
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example helloworld
//! ```

use std::sync::Arc;
use std::time::Duration;

use jobvisor::{AssignJobId, JobError, JobFn, JobId, JobRef, State, Worker};
use tracing_subscriber::EnvFilter;

/// Logs every finished execution together with its job id.
fn log_done(next: JobRef) -> JobRef {
    JobFn::arc(move |state: State| {
        let next = Arc::clone(&next);
        async move {
            let id = JobId::from_state(&state);
            let res = next.run(state).await;
            match id {
                Some(id) => tracing::info!(job_id = %id, ok = res.is_ok(), "job's done"),
                None => tracing::info!(ok = res.is_ok(), "job's done"),
            }
            res
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 2. Job
    let hello = JobFn::arc(|state: State| async move {
        println!("Hello #{}", state.seq());
        Ok::<(), JobError>(())
    });

    // 3. Worker
    let worker = Worker::builder(hello)
        .jobs_limit(1)
        .success_delay(Duration::from_millis(500))
        .shutdown_poll_interval(Duration::from_millis(100))
        .middleware(AssignJobId)
        .middleware(log_done)
        .with_logging()
        .build();

    // 4. Run for a while, then stop
    worker.run()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    worker.shutdown_timeout(Duration::from_secs(1)).await?;
    Ok(())
}

//! # Example: jobttl
//!
//! A job that always outlives its time-to-live.
//!
//! Demonstrates how to:
//! - Bound each execution with [`JobTtl`].
//! - Observe the deadline from inside the job through its context.
//! - See that the worker is released at the deadline while the abandoned
//!   execution finishes on its own.
//!
//! ## Flow
//! ```text
//! JobTtl(100ms) ─► AssignJobId ─► LogErrors ─► job (200ms)
//!     ├─► t=100ms: JobTtl returns DeadlineExceeded, the slot waits error_delay
//!     └─► t=200ms: abandoned job sees ctx.err() and returns,
//!                  LogErrors logs it, the result is dropped
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example jobttl
//! ```

use std::time::Duration;

use jobvisor::{AssignJobId, JobError, JobFn, JobId, JobTtl, State, Worker};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let slow = JobFn::arc(|state: State| async move {
        let id = JobId::from_state(&state);
        println!("started {id:?}");

        // emulate a long execution
        tokio::time::sleep(Duration::from_millis(200)).await;

        if let Some(reason) = state.context().err() {
            println!("gave up {id:?}: {reason}");
            return Err(reason.into());
        }

        // never reached: the job runs longer than its ttl
        println!("finished {id:?}");
        Ok::<(), JobError>(())
    });

    let worker = Worker::builder(slow)
        .error_delay(Duration::from_secs(1))
        .middleware(JobTtl::new(Duration::from_millis(100)))
        .middleware(AssignJobId)
        .with_logging()
        .build();

    worker.run()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    worker.shutdown_timeout(Duration::from_secs(1)).await?;
    Ok(())
}

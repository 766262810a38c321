//! # Example: recover
//!
//! A job that panics on every third execution.
//!
//! Demonstrates how to:
//! - Contain panics with [`Recover`] so they become [`JobError::Panic`].
//! - Let an outer middleware inspect the contained panic.
//! - Pace retries after failures with the error delay.
//!
//! ## Run
//! ```bash
//! cargo run --example recover
//! ```

use std::sync::Arc;
use std::time::Duration;

use jobvisor::{JobError, JobFn, JobRef, Recover, State, Worker};
use tracing_subscriber::EnvFilter;

fn report_panics(next: JobRef) -> JobRef {
    JobFn::arc(move |state: State| {
        let next = Arc::clone(&next);
        async move {
            let res = next.run(state).await;
            if let Err(err @ JobError::Panic { .. }) = &res {
                println!("contained: {}", err.as_message());
            }
            res
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let flaky = JobFn::arc(|state: State| async move {
        if state.seq() % 3 == 0 {
            panic!("job #{} exploded", state.seq());
        }
        println!("job #{} ok", state.seq());
        Ok::<(), JobError>(())
    });

    let worker = Worker::builder(flaky)
        .success_delay(Duration::from_millis(200))
        .error_delay(Duration::from_millis(500))
        .middleware(report_panics)
        .middleware(Recover)
        .with_logging()
        .build();

    worker.run()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    worker.shutdown_timeout(Duration::from_secs(1)).await?;
    Ok(())
}

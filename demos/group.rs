//! # Example: group
//!
//! Two workers started and stopped together through a [`WorkerGroup`].
//!
//! Members are visited in order; shutdown is sequential, so each member
//! drains before the next one is asked to stop.
//!
//! ## Run
//! ```bash
//! cargo run --example group
//! ```

use std::sync::Arc;
use std::time::Duration;

use jobvisor::{Context, JobError, JobFn, JobRef, Lifecycle, State, Worker, WorkerGroup};
use tracing_subscriber::EnvFilter;

fn ticker(name: &'static str) -> JobRef {
    JobFn::arc(move |state: State| async move {
        println!("[{name}] tick {}", state.seq());
        Ok::<(), JobError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let fast: Arc<dyn Lifecycle> = Arc::new(
        Worker::builder(ticker("fast"))
            .success_delay(Duration::from_millis(250))
            .with_logging()
            .build(),
    );
    let slow: Arc<dyn Lifecycle> = Arc::new(
        Worker::builder(ticker("slow"))
            .success_delay(Duration::from_secs(1))
            .with_logging()
            .build(),
    );

    let group = WorkerGroup::new(vec![fast, slow]);
    group.run()?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let ctx = Context::background().with_timeout(Duration::from_secs(2));
    group.shutdown(&ctx).await?;
    Ok(())
}

use async_trait::async_trait;

use crate::{error::WorkerError, state::Context};

/// # Something that can be started and stopped.
///
/// Implemented by [`Worker`](crate::Worker) and
/// [`WorkerGroup`](crate::WorkerGroup), so groups can contain groups.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Starts the run loop.
    fn run(&self) -> Result<(), WorkerError>;

    /// Stops dispatching and waits for in-flight work, bounded by `ctx`.
    async fn shutdown(&self, ctx: &Context) -> Result<(), WorkerError>;
}

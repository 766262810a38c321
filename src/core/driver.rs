//! # LoopDriver: the dispatch loop of one run.
//!
//! Keeps dispatching job executions until the stop signal (`closed`) fires,
//! never exceeding the configured number of concurrently held slots.
//!
//! ## Architecture
//! ```text
//! Worker::run() ──► driver::spawn() ──► LoopDriver::run()   (own task)
//!
//! startup delay (select with closed)
//! loop {
//!   ├─► closed cancelled?           → exit
//!   ├─► reap finished executions    (log uncontained panics)
//!   ├─► acquire slot permit         (select with closed)
//!   ├─► seq += 1
//!   └─► JoinSet::spawn(runner::execute(job, permit, seq))
//! }
//! drain JoinSet                      (every slot handed back)
//! done.cancel()                      (via drop guard, also on early exit)
//! ```
//!
//! ## Rules
//! - Permits are acquired **sequentially** by the driver, so at most
//!   `jobs_limit` executions hold one at any time.
//! - Job bodies run on their own tasks; a stuck job never stops the driver
//!   from observing `closed`, it only keeps its slot busy.
//! - `done` fires once, after the loop has exited **and** all dispatched
//!   executions have finished.
//! - An uncontained job panic ends that execution only; it is logged and
//!   its slot is released, the loop carries on.

use std::sync::Arc;

use tokio::{
    select,
    sync::Semaphore,
    task::{JoinError, JoinSet},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{WorkerConfig, runner},
    jobs::JobRef,
    middleware::panic_message,
};

/// Starts the dispatch loop on its own task and returns its done signal.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn(
    job: JobRef,
    cfg: Arc<WorkerConfig>,
    closed: CancellationToken,
) -> CancellationToken {
    let done = CancellationToken::new();
    let driver = LoopDriver { job, cfg, closed };
    tokio::spawn(driver.run(done.clone()));
    done
}

/// Dispatch loop state for one run.
pub(crate) struct LoopDriver {
    /// Job with the middleware chain already applied.
    job: JobRef,
    /// Worker settings (limit, delays, startup delay).
    cfg: Arc<WorkerConfig>,
    /// Stop signal: once cancelled, nothing new is dispatched.
    closed: CancellationToken,
}

impl LoopDriver {
    /// Runs until `closed` fires, then waits for in-flight executions and fires `done`.
    pub(crate) async fn run(self, done: CancellationToken) {
        let _done = done.drop_guard();

        if let Some(delay) = self.cfg.startup_delay() {
            select! {
                _ = time::sleep(delay) => {}
                _ = self.closed.cancelled() => {
                    tracing::debug!("worker stopped during startup delay");
                    return;
                }
            }
        }

        let limit = self.cfg.jobs_limit_clamped();
        let slots = Arc::new(Semaphore::new(limit));
        let mut running = JoinSet::new();
        let mut seq: u64 = 0;
        tracing::debug!(jobs_limit = limit, "job loop started");

        loop {
            if self.closed.is_cancelled() {
                break;
            }
            while let Some(joined) = running.try_join_next() {
                report(joined);
            }

            let permit = select! {
                biased;
                _ = self.closed.cancelled() => break,
                res = Arc::clone(&slots).acquire_owned() => match res {
                    Ok(permit) => permit,
                    Err(_closed) => break,
                },
            };

            seq += 1;
            running.spawn(runner::execute(
                Arc::clone(&self.job),
                self.cfg.delays,
                self.closed.clone(),
                permit,
                seq,
            ));
        }

        tracing::debug!(dispatched = seq, in_flight = running.len(), "job loop draining");
        while let Some(joined) = running.join_next().await {
            report(joined);
        }
        tracing::debug!(dispatched = seq, "job loop exited");
    }
}

/// Logs an execution that died instead of returning.
fn report(joined: Result<(), JoinError>) {
    match joined {
        Ok(()) => {}
        Err(err) if err.is_panic() => {
            let payload = err.into_panic();
            tracing::error!(panic = %panic_message(payload.as_ref()), "job panicked");
        }
        Err(err) => tracing::warn!(error = %err, "job execution aborted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::JobError;
    use crate::jobs::JobFn;
    use crate::state::State;

    fn counting_job(calls: Arc<AtomicUsize>) -> JobRef {
        JobFn::arc(move |_state: State| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                time::sleep(Duration::from_millis(10)).await;
                Ok::<(), JobError>(())
            }
        })
    }

    #[tokio::test]
    async fn done_fires_after_stop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let closed = CancellationToken::new();
        let done = spawn(
            counting_job(Arc::clone(&calls)),
            Arc::new(WorkerConfig::default()),
            closed.clone(),
        );

        time::sleep(Duration::from_millis(50)).await;
        assert!(!done.is_cancelled());
        closed.cancel();

        time::timeout(Duration::from_secs(1), done.cancelled())
            .await
            .expect("loop did not finish");
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn stop_during_startup_delay_dispatches_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let closed = CancellationToken::new();
        let cfg = WorkerConfig {
            run_delay: Duration::from_secs(60),
            ..WorkerConfig::default()
        };
        let done = spawn(counting_job(Arc::clone(&calls)), Arc::new(cfg), closed.clone());

        time::sleep(Duration::from_millis(20)).await;
        closed.cancel();

        time::timeout(Duration::from_secs(1), done.cancelled())
            .await
            .expect("loop did not finish");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn panics_do_not_stop_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let job: JobRef = JobFn::arc(move |_state: State| {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                    panic!("early failure");
                }
                time::sleep(Duration::from_millis(5)).await;
                Ok::<(), JobError>(())
            }
        });
        let closed = CancellationToken::new();
        let done = spawn(job, Arc::new(WorkerConfig::default()), closed.clone());

        time::sleep(Duration::from_millis(100)).await;
        closed.cancel();
        time::timeout(Duration::from_secs(1), done.cancelled())
            .await
            .expect("loop did not finish");

        assert!(calls.load(Ordering::SeqCst) > 3);
    }
}

//! # Worker: start/stop controller for one job.
//!
//! [`Worker`] owns a job, its [`WorkerConfig`] and its [`Events`]. It
//! guarantees that at most **one** dispatch loop is active at a time and
//! turns `run`/`shutdown` calls into loop start and cooperative stop.
//!
//! ## Signals
//! Each accepted `run` creates a fresh pair of one-shot signals:
//! - `closed`: cancelled by `shutdown`; the loop stops dispatching.
//! - `done`: cancelled by the loop once it exited and all jobs finished.
//!
//! The pair is never reused; the next accepted `run` replaces it.
//!
//! ## Concurrency contract
//! - Racing `run` calls: exactly one succeeds, the rest get
//!   [`WorkerError::AlreadyRunning`].
//! - Racing `shutdown` calls: exactly one closes the loop, the rest get
//!   [`WorkerError::Closed`].
//! - Only the decision prefix of each call runs under the lock; the waiting
//!   phase of `shutdown` does not hold it.
//! - A new `run` is rejected until the previous loop signalled `done`, even
//!   if the `shutdown` that stopped it gave up at its deadline.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use jobvisor::{JobError, JobFn, State, Worker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = Worker::builder(JobFn::arc(|state: State| async move {
//!         println!("job #{}", state.seq());
//!         Ok::<(), JobError>(())
//!     }))
//!     .success_delay(Duration::from_millis(100))
//!     .build();
//!
//!     worker.run()?;
//!     tokio::time::sleep(Duration::from_millis(250)).await;
//!     worker.shutdown_timeout(Duration::from_secs(1)).await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    select,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{Lifecycle, WorkerBuilder, WorkerConfig, driver},
    error::WorkerError,
    jobs::JobRef,
    middleware,
    state::Context,
    subscribers::Events,
};

/// Signals of the current (or last) run.
struct Signals {
    /// Open while the loop may dispatch.
    closed: CancellationToken,
    /// Cancelled once the loop has fully exited.
    done: CancellationToken,
}

/// Runs a job repeatedly, `jobs_limit` at a time, until shut down.
pub struct Worker {
    /// Guards start/stop decisions.
    signals: Mutex<Option<Signals>>,
    /// Lifecycle subscribers.
    events: Events,
    /// The job, without middleware.
    job: JobRef,
    /// Settings shared with every loop this worker starts.
    cfg: Arc<WorkerConfig>,
}

impl Worker {
    /// Creates a worker with an explicit configuration and no subscribers.
    pub fn new(job: JobRef, cfg: WorkerConfig) -> Self {
        Self::from_parts(job, cfg, Events::new())
    }

    /// Starts building a worker for `job`.
    pub fn builder(job: JobRef) -> WorkerBuilder {
        WorkerBuilder::new(job)
    }

    pub(crate) fn from_parts(job: JobRef, cfg: WorkerConfig, events: Events) -> Self {
        Self {
            signals: Mutex::new(None),
            events,
            job,
            cfg: Arc::new(cfg),
        }
    }

    /// Returns the worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.cfg
    }

    /// Returns the registered subscribers.
    pub fn events(&self) -> &Events {
        &self.events
    }

    /// True while a dispatch loop exists that has not signalled done.
    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|s| !s.done.is_cancelled())
    }

    /// Starts the dispatch loop.
    ///
    /// Returns [`WorkerError::AlreadyRunning`] (changing nothing) while a
    /// previous loop is still active. Subscribers are notified of the outcome
    /// either way.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime, like [`tokio::spawn`].
    pub fn run(&self) -> Result<(), WorkerError> {
        let res = self.start();
        self.events.emit_run(&res);
        res
    }

    fn start(&self) -> Result<(), WorkerError> {
        let mut signals = self.lock();

        if let Some(current) = signals.as_ref() {
            if !current.done.is_cancelled() {
                return Err(WorkerError::AlreadyRunning);
            }
        }

        let closed = CancellationToken::new();
        let job = middleware::chain(Arc::clone(&self.job), &self.cfg.middlewares);
        let done = driver::spawn(job, Arc::clone(&self.cfg), closed.clone());
        *signals = Some(Signals { closed, done });

        tracing::debug!(
            jobs_limit = self.cfg.jobs_limit_clamped(),
            middlewares = self.cfg.middlewares.len(),
            "worker run accepted"
        );
        Ok(())
    }

    /// Stops dispatching new jobs and waits for the loop to finish.
    ///
    /// Waits until every in-flight job has returned (and its delay, cut short
    /// by the stop, has elapsed) or until `ctx` is done, whichever comes first.
    /// In the latter case the context's reason is returned and the jobs keep
    /// running; the worker only becomes runnable again once they finish.
    ///
    /// Returns [`WorkerError::Closed`] if the worker was never started or is
    /// already stopping. Subscribers are notified of the outcome either way.
    pub async fn shutdown(&self, ctx: &Context) -> Result<(), WorkerError> {
        let res = self.stop(ctx).await;
        self.events.emit_shutdown(&res);
        res
    }

    /// [`shutdown`](Self::shutdown) with a deadline of `now + timeout`.
    pub async fn shutdown_timeout(&self, timeout: Duration) -> Result<(), WorkerError> {
        self.shutdown(&Context::background().with_timeout(timeout))
            .await
    }

    async fn stop(&self, ctx: &Context) -> Result<(), WorkerError> {
        let done = {
            let signals = self.lock();
            let Some(current) = signals.as_ref() else {
                return Err(WorkerError::Closed);
            };
            if current.closed.is_cancelled() {
                return Err(WorkerError::Closed);
            }

            current.closed.cancel();
            tracing::debug!("worker shutdown requested");

            if current.done.is_cancelled() {
                return Err(WorkerError::Closed);
            }
            current.done.clone()
        };

        let mut ticker = time::interval(self.cfg.shutdown_poll_interval_clamped());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            select! {
                biased;
                _ = done.cancelled() => return Ok(()),
                reason = ctx.done() => return Err(reason.into()),
                _ = ticker.tick() => tracing::trace!("waiting for job loop to exit"),
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Signals>> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Lifecycle for Worker {
    fn run(&self) -> Result<(), WorkerError> {
        Worker::run(self)
    }

    async fn shutdown(&self, ctx: &Context) -> Result<(), WorkerError> {
        Worker::shutdown(self, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

    use crate::error::JobError;
    use crate::jobs::JobFn;
    use crate::middleware::Recover;
    use crate::state::State;

    fn nop() -> JobRef {
        JobFn::arc(|_state: State| async { Ok::<(), JobError>(()) })
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let w = Worker::builder(nop())
            .success_delay(Duration::from_secs(1))
            .build();

        assert_eq!(w.run(), Ok(()));
        assert_eq!(w.run(), Err(WorkerError::AlreadyRunning));
        assert!(w.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_runs_admit_exactly_one() {
        let w = Arc::new(
            Worker::builder(nop())
                .success_delay(Duration::from_secs(1))
                .build(),
        );

        let mut handles = Vec::new();
        for _ in 0..10 {
            let w = Arc::clone(&w);
            handles.push(tokio::spawn(async move { w.run() }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(()) => ok += 1,
                Err(err) => assert_eq!(err, WorkerError::AlreadyRunning),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn shutdown_before_run_is_closed() {
        let w = Worker::builder(nop()).build();
        assert_eq!(
            w.shutdown(&Context::background()).await,
            Err(WorkerError::Closed)
        );
    }

    #[tokio::test]
    async fn shutdown_deadline_is_reported() {
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        let w = Worker::builder(JobFn::arc(|_state: State| async {
            time::sleep(Duration::from_secs(5)).await;
            Ok::<(), JobError>(())
        }))
        .shutdown_poll_interval(Duration::from_millis(200))
        .listen_shutdown(move |outcome| {
            if outcome == Err(&WorkerError::DeadlineExceeded) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(20)).await;

        let res = w.shutdown_timeout(Duration::from_millis(100)).await;
        assert_eq!(res, Err(WorkerError::DeadlineExceeded));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // the stuck job still owns the loop
        assert!(w.is_running());
        assert_eq!(w.run(), Err(WorkerError::AlreadyRunning));
        assert_eq!(
            w.shutdown_timeout(Duration::from_millis(10)).await,
            Err(WorkerError::Closed)
        );
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_interrupts_delays() {
        let fired = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&fired);
        let w = Worker::builder(nop())
            .success_delay(Duration::from_secs(1))
            .shutdown_poll_interval(Duration::from_millis(500))
            .listen_shutdown(move |outcome| {
                assert!(outcome.is_ok());
                seen.store(true, Ordering::SeqCst);
            })
            .build();

        assert_eq!(w.run(), Ok(()));
        assert_eq!(w.shutdown_timeout(Duration::from_millis(250)).await, Ok(()));
        assert!(fired.load(Ordering::SeqCst));
        assert!(!w.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_shutdowns_admit_exactly_one() {
        let w = Arc::new(
            Worker::builder(nop())
                .success_delay(Duration::from_secs(1))
                .build(),
        );
        assert_eq!(w.run(), Ok(()));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let w = Arc::clone(&w);
            handles.push(tokio::spawn(async move {
                w.shutdown(&Context::background()).await
            }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(()) => ok += 1,
                Err(err) => assert_eq!(err, WorkerError::Closed),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn run_again_after_shutdown() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let w = Worker::builder(nop())
            .success_delay(Duration::from_millis(50))
            .listen_run(move |outcome| {
                if outcome.is_ok() {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build();

        for _ in 0..3 {
            assert_eq!(w.run(), Ok(()));
            assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));
        }
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrency_never_exceeds_limit() {
        for limit in [1, 2, 3, 5] {
            let in_flight = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));
            let (current, max) = (Arc::clone(&in_flight), Arc::clone(&peak));

            let w = Worker::builder(JobFn::arc(move |_state: State| {
                let current = Arc::clone(&current);
                let max = Arc::clone(&max);
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    max.fetch_max(now, Ordering::SeqCst);
                    time::sleep(Duration::from_millis(30)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), JobError>(())
                }
            }))
            .jobs_limit(limit)
            .build();

            assert_eq!(w.run(), Ok(()));
            time::sleep(Duration::from_millis(300)).await;
            assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));

            assert_eq!(peak.load(Ordering::SeqCst), limit, "jobs_limit = {limit}");
            assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn unbounded_shutdown_timeout_waits_for_the_loop() {
        let w = Worker::builder(nop())
            .success_delay(Duration::from_secs(1))
            .build();

        assert_eq!(w.run(), Ok(()));
        assert_eq!(w.shutdown_timeout(Duration::MAX).await, Ok(()));
        assert!(!w.is_running());
    }

    #[tokio::test]
    async fn shutdown_waits_for_in_flight_jobs() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));

        let w = Worker::builder(JobFn::arc(move |_state: State| {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                time::sleep(Duration::from_millis(100)).await;
                f.fetch_add(1, Ordering::SeqCst);
                Ok::<(), JobError>(())
            }
        }))
        .jobs_limit(2)
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(20)).await;
        assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));

        assert!(started.load(Ordering::SeqCst) >= 1);
        assert_eq!(started.load(Ordering::SeqCst), finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn jobs_observe_shutdown_through_context() {
        let w = Worker::builder(JobFn::arc(|state: State| async move {
            Err(JobError::from(state.context().done().await))
        }))
        .jobs_limit(4)
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(20)).await;
        assert_eq!(w.shutdown_timeout(Duration::from_millis(500)).await, Ok(()));
    }

    #[tokio::test]
    async fn dispatch_sequence_is_monotonic() {
        let seqs = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seqs);
        let w = Worker::builder(JobFn::arc(move |state: State| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(state.seq());
                Err(JobError::Idle)
            }
        }))
        .idle_delay(Duration::from_millis(10))
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));

        let seqs = seqs.lock().unwrap();
        assert!(seqs.len() >= 2);
        assert!(seqs.iter().zip(1..).all(|(seq, expected)| *seq == expected));
    }

    #[tokio::test]
    async fn idle_delay_throttles_dispatch() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let w = Worker::builder(JobFn::arc(move |_state: State| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(JobError::Idle)
            }
        }))
        .idle_delay(Duration::from_secs(10))
        .success_delay(Duration::ZERO)
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));
    }

    #[tokio::test]
    async fn recovered_panics_reach_outer_middleware() {
        let panics = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&panics);
        let observe = move |next: JobRef| -> JobRef {
            let counter = Arc::clone(&counter);
            JobFn::arc(move |state: State| {
                let next = Arc::clone(&next);
                let counter = Arc::clone(&counter);
                async move {
                    let res = next.run(state).await;
                    if let Err(JobError::Panic { message, .. }) = &res {
                        assert!(message.contains("test panic"));
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    res
                }
            })
        };

        let w = Worker::builder(JobFn::arc(|_state: State| async {
            if true {
                panic!("test panic");
            }
            Ok::<(), JobError>(())
        }))
        .error_delay(Duration::from_millis(10))
        .middleware(observe)
        .middleware(Recover)
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));
        assert!(panics.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn uncontained_panics_keep_the_worker_alive() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let w = Worker::builder(JobFn::arc(move |_state: State| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                time::sleep(Duration::from_millis(5)).await;
                if true {
                    panic!("no recover");
                }
                Ok::<(), JobError>(())
            }
        }))
        .build();

        assert_eq!(w.run(), Ok(()));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(w.shutdown_timeout(Duration::from_secs(1)).await, Ok(()));
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }
}

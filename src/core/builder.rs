use std::sync::Arc;
use std::time::Duration;

use crate::{
    core::{Worker, WorkerConfig},
    jobs::JobRef,
    middleware::{LogErrors, Middleware, MiddlewareRef},
    subscribers::{Events, LogWriter, Outcome, Subscribe},
};

/// Builder for constructing a [`Worker`].
///
/// Zero values passed to [`jobs_limit`](Self::jobs_limit),
/// [`run_delay`](Self::run_delay) and
/// [`shutdown_poll_interval`](Self::shutdown_poll_interval) are ignored and
/// the defaults stay in place.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use jobvisor::{AssignJobId, JobError, JobFn, JobTtl, Recover, State, Worker};
///
/// let worker = Worker::builder(JobFn::arc(|_state: State| async { Err(JobError::Idle) }))
///     .jobs_limit(4)
///     .idle_delay(Duration::from_secs(1))
///     .error_delay(Duration::from_secs(5))
///     .middleware(Recover)
///     .middleware(AssignJobId)
///     .middleware(JobTtl::new(Duration::from_secs(30)))
///     .listen_shutdown(|outcome| println!("stopped: {outcome:?}"))
///     .build();
///
/// assert_eq!(worker.config().jobs_limit, 4);
/// ```
pub struct WorkerBuilder {
    job: JobRef,
    cfg: WorkerConfig,
    events: Events,
}

impl WorkerBuilder {
    /// Creates a new builder for `job` with the default configuration.
    pub fn new(job: JobRef) -> Self {
        Self {
            job,
            cfg: WorkerConfig::default(),
            events: Events::new(),
        }
    }

    /// Sets the maximum number of concurrently executing jobs.
    pub fn jobs_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.cfg.jobs_limit = limit;
        }
        self
    }

    /// Delays the first dispatch of every run.
    pub fn run_delay(mut self, delay: Duration) -> Self {
        if !delay.is_zero() {
            self.cfg.run_delay = delay;
        }
        self
    }

    /// Wait after a job that returned `Ok(())`.
    pub fn success_delay(mut self, delay: Duration) -> Self {
        self.cfg.delays.success = delay;
        self
    }

    /// Wait after a job that returned an error other than `Idle`.
    pub fn error_delay(mut self, delay: Duration) -> Self {
        self.cfg.delays.error = delay;
        self
    }

    /// Wait after a job that returned [`JobError::Idle`](crate::JobError::Idle).
    pub fn idle_delay(mut self, delay: Duration) -> Self {
        self.cfg.delays.idle = delay;
        self
    }

    /// Sets how often `shutdown` ticks while waiting for the loop.
    pub fn shutdown_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.cfg.shutdown_poll_interval = interval;
        }
        self
    }

    /// Appends a middleware; earlier middlewares wrap later ones.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.cfg.middlewares.push(Arc::new(middleware));
        self
    }

    /// Appends several shared middlewares, in order.
    pub fn middlewares(mut self, middlewares: impl IntoIterator<Item = MiddlewareRef>) -> Self {
        self.cfg.middlewares.extend(middlewares);
        self
    }

    /// Registers a lifecycle subscriber.
    pub fn subscriber<S: Subscribe>(mut self, subscriber: S) -> Self {
        self.events.subscribe(Arc::new(subscriber));
        self
    }

    /// Registers several shared subscribers, in order.
    pub fn subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        for sub in subscribers {
            self.events.subscribe(sub);
        }
        self
    }

    /// Registers a closure called after every `run` attempt.
    pub fn listen_run<F>(mut self, f: F) -> Self
    where
        F: Fn(Outcome<'_>) + Send + Sync + 'static,
    {
        self.events.listen_run(f);
        self
    }

    /// Registers a closure called after every `shutdown` attempt.
    pub fn listen_shutdown<F>(mut self, f: F) -> Self
    where
        F: Fn(Outcome<'_>) + Send + Sync + 'static,
    {
        self.events.listen_shutdown(f);
        self
    }

    /// Logs lifecycle outcomes ([`LogWriter`]) and job errors ([`LogErrors`]).
    ///
    /// `LogErrors` is appended at the current end of the middleware list, so
    /// call this after adding [`AssignJobId`](crate::AssignJobId) to get job
    /// ids in the log.
    pub fn with_logging(self) -> Self {
        self.subscriber(LogWriter::new()).middleware(LogErrors)
    }

    /// Builds the worker. Nothing runs until [`Worker::run`] is called.
    pub fn build(self) -> Worker {
        Worker::from_parts(self.job, self.cfg, self.events)
    }
}

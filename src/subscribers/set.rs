//! # Events: ordered subscriber registry
//!
//! [`Events`] holds the subscribers of one worker and fans each lifecycle
//! outcome out to all of them, one after another.
//!
//! ## What it guarantees
//! - Invocation order equals registration order.
//! - Every emitted outcome reaches every subscriber exactly once.
//!
//! ## What it does **not** guarantee
//! - No panic isolation: a panicking subscriber propagates to the caller and
//!   the remaining subscribers are skipped.
//! - No removal API.

use std::sync::Arc;

use crate::error::WorkerError;

use super::{Outcome, Subscribe};

/// Closure listener for `run` outcomes.
struct RunListener<F>(F);

impl<F> Subscribe for RunListener<F>
where
    F: Fn(Outcome<'_>) + Send + Sync + 'static,
{
    fn on_run(&self, outcome: Outcome<'_>) {
        (self.0)(outcome)
    }

    fn name(&self) -> &'static str {
        "run-listener"
    }
}

/// Closure listener for `shutdown` outcomes.
struct ShutdownListener<F>(F);

impl<F> Subscribe for ShutdownListener<F>
where
    F: Fn(Outcome<'_>) + Send + Sync + 'static,
{
    fn on_shutdown(&self, outcome: Outcome<'_>) {
        (self.0)(outcome)
    }

    fn name(&self) -> &'static str {
        "shutdown-listener"
    }
}

/// Ordered, append-only list of subscribers.
#[derive(Clone, Default)]
pub struct Events {
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Events {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscribe>) {
        self.subscribers.push(subscriber);
    }

    /// Appends a closure called after every `run` attempt.
    pub fn listen_run<F>(&mut self, f: F)
    where
        F: Fn(Outcome<'_>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(RunListener(f)));
    }

    /// Appends a closure called after every `shutdown` attempt.
    pub fn listen_shutdown<F>(&mut self, f: F)
    where
        F: Fn(Outcome<'_>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(ShutdownListener(f)));
    }

    /// Reports a `run` outcome to every subscriber.
    pub(crate) fn emit_run(&self, res: &Result<(), WorkerError>) {
        for sub in &self.subscribers {
            sub.on_run(res.as_ref().map(|_| ()));
        }
    }

    /// Reports a `shutdown` outcome to every subscriber.
    pub(crate) fn emit_shutdown(&self, res: &Result<(), WorkerError>) {
        for sub in &self.subscribers {
            sub.on_shutdown(res.as_ref().map(|_| ()));
        }
    }

    /// Names of the registered subscribers, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn listeners_fire_in_registration_order() {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut events = Events::new();

        for name in ["first", "second"] {
            let run_log = Arc::clone(&log);
            events.listen_run(move |outcome| {
                run_log
                    .lock()
                    .unwrap()
                    .push(format!("{name}:run:{}", outcome.is_ok()));
            });
        }
        let shutdown_log = Arc::clone(&log);
        events.listen_shutdown(move |outcome| {
            let label = outcome.err().map(WorkerError::as_label).unwrap_or("ok");
            shutdown_log.lock().unwrap().push(format!("shutdown:{label}"));
        });

        events.emit_run(&Ok(()));
        events.emit_shutdown(&Err(WorkerError::Closed));
        events.emit_run(&Err(WorkerError::AlreadyRunning));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:run:true",
                "second:run:true",
                "shutdown:worker_closed",
                "first:run:false",
                "second:run:false",
            ]
        );
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.names(),
            vec!["run-listener", "run-listener", "shutdown-listener"]
        );
    }
}

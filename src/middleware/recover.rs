//! # Panic containment.
//!
//! [`Recover`] polls the rest of the chain under `catch_unwind`. A panic is
//! converted into [`JobError::Panic`] carrying the payload text and a
//! backtrace of the recovering frame (not of the panic site). The job's slot
//! is then handled like any other failed job (error delay, then release).
//!
//! Without `Recover` a panicking job still releases its slot, but the panic
//! only reaches the log, not the job's result.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::JobError;
use crate::jobs::{JobFn, JobRef};
use crate::middleware::Middleware;
use crate::state::State;

/// Middleware converting panics into [`JobError::Panic`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Recover;

impl Middleware for Recover {
    fn wrap(&self, next: JobRef) -> JobRef {
        JobFn::arc(move |state: State| {
            let next = Arc::clone(&next);
            async move {
                let fut = async move { next.run(state).await };
                match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(res) => res,
                    Err(payload) => Err(JobError::Panic {
                        message: panic_message(payload.as_ref()),
                        backtrace: Backtrace::force_capture().to_string(),
                    }),
                }
            }
        })
    }
}

/// Renders a panic payload; `panic!` produces `&str` or `String`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::middleware::chain;

    #[tokio::test]
    async fn panic_becomes_error() {
        let job: JobRef = JobFn::arc(|_state: State| async {
            if true {
                panic!("test");
            }
            Ok::<(), JobError>(())
        });

        let err = chain(job, &[Arc::new(Recover)])
            .run(State::default())
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Panic { ref message, .. } if message == "test"));
        assert!(matches!(err, JobError::Panic { ref backtrace, .. } if !backtrace.is_empty()));
        assert!(err.to_string().contains("job panicked: test"));
    }

    #[tokio::test]
    async fn formatted_payload_is_kept() {
        let job: JobRef = JobFn::arc(|state: State| async move {
            if state.seq() == 0 {
                panic!("x at {}", state.seq());
            }
            Ok::<(), JobError>(())
        });

        let err = chain(job, &[Arc::new(Recover)])
            .run(State::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("x at 0"));
    }

    #[tokio::test]
    async fn errors_pass_through_untouched() {
        let job: JobRef = JobFn::arc(|_state: State| async { Err(JobError::fail("plain")) });
        let res = chain(job, &[Arc::new(Recover)]).run(State::default()).await;
        assert_eq!(res, Err(JobError::fail("plain")));
    }
}

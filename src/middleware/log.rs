//! # Job error logging.
//!
//! [`LogErrors`] logs every job error through `tracing` at `error` level with
//! the job's [`JobId`] (when [`AssignJobId`](crate::AssignJobId) runs further
//! out) and dispatch sequence. The `Idle` and `Closed` sentinels are not
//! errors and are not logged. The result is returned unchanged.

use std::sync::Arc;

use crate::jobs::{JobFn, JobRef};
use crate::middleware::{JobId, Middleware};
use crate::state::State;

/// Middleware logging failed jobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrors;

impl Middleware for LogErrors {
    fn wrap(&self, next: JobRef) -> JobRef {
        JobFn::arc(move |state: State| {
            let next = Arc::clone(&next);
            async move {
                let job_id = JobId::from_state(&state)
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                let seq = state.seq();

                let res = next.run(state).await;
                if let Err(err) = &res {
                    if !err.is_sentinel() {
                        tracing::error!(
                            job_id = %job_id,
                            seq,
                            label = err.as_label(),
                            error = %err.as_message(),
                            "job error"
                        );
                    }
                }
                res
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::JobError;
    use crate::middleware::{AssignJobId, chain};

    #[tokio::test]
    async fn results_are_returned_unchanged() {
        for expected in [
            Ok(()),
            Err(JobError::Idle),
            Err(JobError::Closed),
            Err(JobError::fail("boom")),
        ] {
            let value = expected.clone();
            let job: JobRef = JobFn::arc(move |_state: State| {
                let value = value.clone();
                async move { value }
            });
            let wrapped = chain(job, &[Arc::new(AssignJobId), Arc::new(LogErrors)]);
            assert_eq!(wrapped.run(State::default()).await, expected);
        }
    }
}

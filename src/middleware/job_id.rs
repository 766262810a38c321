//! # Job identity tagging.
//!
//! [`AssignJobId`] generates a random [`JobId`] (UUID v4) for every invocation
//! and binds it into the state's context, so anything further down the chain
//! (including the job) can read it with [`JobId::from_state`] or
//! [`JobId::from_context`].

use std::fmt;

use uuid::Uuid;

use crate::jobs::{JobFn, JobRef};
use crate::middleware::Middleware;
use crate::state::{Context, State};

/// Unique identifier of one job invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the identifier bound to the state's context, if any.
    pub fn from_state(state: &State) -> Option<JobId> {
        Self::from_context(&state.context())
    }

    /// Returns the identifier bound to `ctx`, if any.
    pub fn from_context(ctx: &Context) -> Option<JobId> {
        ctx.value::<JobId>().copied()
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware attaching a fresh [`JobId`] to every invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssignJobId;

impl Middleware for AssignJobId {
    fn wrap(&self, next: JobRef) -> JobRef {
        JobFn::arc(move |state: State| {
            let ctx = state.context().with_value(JobId::new());
            next.run(state.with_context(ctx))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::JobError;
    use crate::middleware::chain;

    #[tokio::test]
    async fn job_sees_identifier_from_state_and_context() {
        let seen: Arc<Mutex<Vec<JobId>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let job: JobRef = JobFn::arc(move |state: State| {
            let sink = Arc::clone(&sink);
            async move {
                let id = JobId::from_state(&state).ok_or(JobError::fail("missing job id"))?;
                assert_eq!(Some(id), JobId::from_context(&state.context()));
                sink.lock().unwrap().push(id);
                Ok::<(), JobError>(())
            }
        });

        let wrapped = chain(job, &[Arc::new(AssignJobId)]);
        assert_eq!(wrapped.run(State::default()).await, Ok(()));
        assert_eq!(wrapped.run(State::default()).await, Ok(()));

        let ids = seen.lock().unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(!ids[0].to_string().is_empty());
    }

    #[test]
    fn untagged_state_has_no_identifier() {
        assert!(JobId::from_state(&State::default()).is_none());
    }
}

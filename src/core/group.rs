//! # WorkerGroup: several lifecycles driven as one.
//!
//! Members are started and stopped **in order**, one after another. The
//! first error stops the walk and is returned; members after it are not
//! touched, members before it are left as they are (no rollback).
//!
//! ## Known limitation
//! Shutdown is sequential: every member waits on the same context, so the
//! group may need the sum of the members' drain times rather than the
//! maximum. A short deadline can expire while early members drain, leaving
//! later members untouched.
//!
//! Groups implement [`Lifecycle`] themselves and can be nested.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{core::Lifecycle, error::WorkerError, state::Context};

/// Ordered set of lifecycles started and stopped together.
pub struct WorkerGroup {
    members: Vec<Arc<dyn Lifecycle>>,
}

impl WorkerGroup {
    /// Creates a group; `run`/`shutdown` visit members in this order.
    pub fn new(members: Vec<Arc<dyn Lifecycle>>) -> Self {
        Self { members }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl Lifecycle for WorkerGroup {
    fn run(&self) -> Result<(), WorkerError> {
        for (idx, member) in self.members.iter().enumerate() {
            if let Err(err) = member.run() {
                tracing::debug!(member = idx, error = %err, "group run stopped");
                return Err(err);
            }
        }
        Ok(())
    }

    async fn shutdown(&self, ctx: &Context) -> Result<(), WorkerError> {
        for (idx, member) in self.members.iter().enumerate() {
            if let Err(err) = member.shutdown(ctx).await {
                tracing::debug!(member = idx, error = %err, "group shutdown stopped");
                return Err(err);
            }
        }
        Ok(())
    }
}

//! # Execute a single job dispatch.
//!
//! Runs one invocation of the (already wrapped) job, then holds the slot for
//! the post-job delay picked by [`Delays`], then releases the slot.
//!
//! ## Flow
//! ```text
//! permit acquired by driver
//!   └─► State { ctx: stop-signal context, seq }
//!        └─► job.run(state).await
//!             └─► delay = delays.after(&result)
//!                  └─► select! { sleep(delay), closed.cancelled() }
//!                       └─► drop(permit)
//! ```
//!
//! ## Rules
//! - The permit is owned by this future: it is released on return **and** when
//!   the job panics (unwinding drops it).
//! - A closing stop signal cuts the delay short; it does not interrupt the job.

use tokio::{select, sync::OwnedSemaphorePermit, time};
use tokio_util::sync::CancellationToken;

use crate::{
    jobs::JobRef,
    policies::Delays,
    state::{Context, State},
};

/// Executes dispatch number `seq` and frees `permit` afterwards.
pub(crate) async fn execute(
    job: JobRef,
    delays: Delays,
    closed: CancellationToken,
    permit: OwnedSemaphorePermit,
    seq: u64,
) {
    let state = State::dispatched(Context::from_token(closed.clone()), seq);
    let res = job.run(state).await;

    let delay = delays.after(&res);
    tracing::trace!(
        seq,
        ok = res.is_ok(),
        delay_ms = delay.as_millis() as u64,
        "job finished"
    );

    if !delay.is_zero() {
        select! {
            _ = time::sleep(delay) => {}
            _ = closed.cancelled() => {}
        }
    }
    drop(permit);
}

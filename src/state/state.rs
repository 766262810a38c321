//! # Job state carrier.
//!
//! [`State`] is what a job (and every middleware around it) receives. It is
//! copy-on-write: [`State::with_context`] returns a new carrier and never
//! touches the receiver, so a middleware can hand a narrowed context to the
//! next handler without the outer layers observing it.

use crate::state::Context;

/// Per-dispatch context holder.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use jobvisor::{Context, State};
///
/// let state = State::default();
/// assert!(state.context().deadline().is_none());
///
/// let narrowed = state.with_context(state.context().with_timeout(Duration::from_secs(1)));
/// assert!(narrowed.context().deadline().is_some());
/// assert!(state.context().deadline().is_none());
///
/// // `None` leaves the carrier as it was.
/// let same = state.with_context(None::<Context>);
/// assert!(same.context().deadline().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct State {
    ctx: Option<Context>,
    seq: u64,
}

impl State {
    /// Creates a state holding `ctx`.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx: Some(ctx),
            seq: 0,
        }
    }

    /// State handed to the `seq`-th job dispatched by a run loop.
    pub(crate) fn dispatched(ctx: Context, seq: u64) -> Self {
        Self { ctx: Some(ctx), seq }
    }

    /// Returns the held context, or a background context if none was set.
    pub fn context(&self) -> Context {
        self.ctx.clone().unwrap_or_default()
    }

    /// Returns a carrier with the context replaced.
    ///
    /// `None` yields an unchanged copy. The receiver is never modified.
    pub fn with_context(&self, ctx: impl Into<Option<Context>>) -> State {
        match ctx.into() {
            None => self.clone(),
            Some(ctx) => State {
                ctx: Some(ctx),
                ..self.clone()
            },
        }
    }

    /// 1-based dispatch number within the current run (`0` outside a worker).
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tag(&'static str);

    #[test]
    fn empty_state_falls_back_to_background() {
        let ctx = State::default().context();
        assert!(!ctx.is_done());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn with_none_keeps_everything() {
        let state = State::dispatched(Context::background().with_value(Tag("a")), 7);
        let same = state.with_context(None::<Context>);

        assert_eq!(same.seq(), 7);
        assert_eq!(same.context().value::<Tag>(), Some(&Tag("a")));
    }

    #[test]
    fn with_some_is_copy_on_write() {
        let state = State::dispatched(Context::background().with_value(Tag("a")), 3);
        let derived = state.with_context(Context::background().with_value(Tag("b")));

        assert_eq!(state.context().value::<Tag>(), Some(&Tag("a")));
        assert_eq!(derived.context().value::<Tag>(), Some(&Tag("b")));
        assert_eq!(derived.seq(), 3);
    }
}

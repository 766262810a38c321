//! # Scoped execution context.
//!
//! [`Context`] is passed **by value** down the call chain and never mutated in
//! place. Deriving a child returns a new value; the parent is untouched.
//!
//! - Cancellation propagates parent → child through [`CancellationToken`]
//!   child tokens. A child can be cancelled without affecting its parent.
//! - Deadlines only tighten: a child's deadline is the earlier of its own and
//!   its parent's.
//! - Values are stored as a linked chain of overlays keyed by type; lookups
//!   walk from the newest overlay to the oldest.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// One value overlay in the chain.
struct Binding {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Binding>>,
}

/// Cancellable, deadline-bearing scope with inheritable typed values.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use jobvisor::Context;
///
/// #[derive(Debug, PartialEq)]
/// struct Tenant(&'static str);
///
/// let root = Context::background();
/// let (child, cancel) = root.with_cancel();
/// let child = child.with_value(Tenant("acme")).with_timeout(Duration::from_secs(5));
///
/// assert_eq!(child.value::<Tenant>(), Some(&Tenant("acme")));
/// assert!(root.value::<Tenant>().is_none());
///
/// cancel.cancel();
/// assert!(child.is_done());
/// assert!(!root.is_done());
/// ```
#[derive(Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
    values: Option<Arc<Binding>>,
}

impl Context {
    /// Returns a root context: never cancelled, no deadline, no values.
    pub fn background() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// Returns a root context that is done once `token` is cancelled.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
            values: None,
        }
    }

    /// Derives a child that can be cancelled through the returned token.
    ///
    /// Cancelling the token does not affect `self`.
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = self.token.child_token();
        let child = Self {
            token: token.clone(),
            deadline: self.deadline,
            values: self.values.clone(),
        };
        (child, token)
    }

    /// Derives a child that is done at `at` (or earlier, if the parent's deadline is earlier).
    pub fn with_deadline(&self, at: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent <= at => parent,
            _ => at,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
            values: self.values.clone(),
        }
    }

    /// Derives a child that is done after `ttl` from now.
    ///
    /// A `ttl` too large to represent as an instant (e.g. `Duration::MAX`)
    /// adds no deadline.
    pub fn with_timeout(&self, ttl: Duration) -> Self {
        match Instant::now().checked_add(ttl) {
            Some(at) => self.with_deadline(at),
            None => self.clone(),
        }
    }

    /// Derives a child that additionally carries `value`.
    ///
    /// A value of the same type bound by an ancestor is shadowed for this child only.
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let binding = Binding {
            key: TypeId::of::<T>(),
            value: Box::new(value),
            parent: self.values.clone(),
        };
        Self {
            token: self.token.clone(),
            deadline: self.deadline,
            values: Some(Arc::new(binding)),
        }
    }

    /// Looks up the nearest value of type `T`.
    pub fn value<T: 'static>(&self) -> Option<&T> {
        let key = TypeId::of::<T>();
        let mut node = self.values.as_deref();
        while let Some(binding) = node {
            if binding.key == key {
                return binding.value.downcast_ref::<T>();
            }
            node = binding.parent.as_deref();
        }
        None
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(at) if Instant::now() >= at => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// True once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Waits until the context is done and returns the reason.
    ///
    /// Never completes for a background context.
    pub async fn done(&self) -> ContextError {
        match self.deadline {
            Some(at) => tokio::select! {
                biased;
                _ = self.token.cancelled() => ContextError::Canceled,
                _ = time::sleep_until(at) => ContextError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                ContextError::Canceled
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.token.is_cancelled())
            .field("deadline", &self.deadline)
            .field("has_values", &self.values.is_some())
            .finish()
    }
}

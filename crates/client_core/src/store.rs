//! Generic reducer-driven state container.

use std::{fmt, sync::Arc};

use tokio::sync::watch;
use tracing::trace;

pub trait Action: fmt::Debug + Send {
    /// Stable name used in logs.
    fn kind(&self) -> &'static str;
}

/// A state type with a pure transition function.
///
/// `reduce` must not perform I/O and must not fail: every action maps the input state to
/// some output state.
pub trait Reduce: Clone + Default + Send + Sync + 'static {
    type Action: Action;

    fn reduce(self, action: Self::Action) -> Self;
}

/// Holds one state value, applies dispatched actions through [`Reduce::reduce`] and
/// publishes every resulting state to subscribers.
///
/// Cloning yields another handle to the same state.
pub struct Store<S: Reduce> {
    state: Arc<watch::Sender<S>>,
}

impl<S: Reduce> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Reduce> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Reduce> Store<S> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn dispatch(&self, action: S::Action) {
        trace!(action = action.kind(), "dispatch");
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = current.reduce(action);
        });
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    /// Reads from the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }
}

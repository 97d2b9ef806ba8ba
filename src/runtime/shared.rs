//! A machine shared between threads.

use crate::core::{Event, State};
use crate::runtime::machine::{ApplyResult, StateMachine};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to one [`StateMachine`] behind a mutex.
///
/// Every `apply` holds the lock for the whole transition, listeners
/// included, so transitions are serialized and a reader never observes a
/// half-applied event. Listeners must not call back into the same handle;
/// the lock is not reentrant and doing so deadlocks.
pub struct SharedStateMachine<S: State, E: Event> {
    inner: Arc<Mutex<StateMachine<S, E>>>,
}

impl<S: State, E: Event> SharedStateMachine<S, E> {
    pub fn new(machine: StateMachine<S, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    pub fn apply(&self, event: &E) -> ApplyResult<S> {
        self.inner.lock().apply(event)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.inner.lock().state().clone()
    }

    /// Run `f` with exclusive access to the machine.
    pub fn with<R>(&self, f: impl FnOnce(&mut StateMachine<S, E>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<S: State, E: Event> Clone for SharedStateMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> From<StateMachine<S, E>> for SharedStateMachine<S, E> {
    fn from(machine: StateMachine<S, E>) -> Self {
        Self::new(machine)
    }
}

impl<S: State, E: Event> StateMachine<S, E> {
    /// Move this machine behind a shareable handle.
    pub fn into_shared(self) -> SharedStateMachine<S, E> {
        SharedStateMachine::new(self)
    }
}

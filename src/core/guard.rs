//! Guard predicates for controlling guarded transitions.
//!
//! Guards are pure boolean functions over the current state value. A guarded
//! transition only fires when its guard accepts the live state.

use super::state::State;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a guarded transition can fire.
///
/// Guards are cheap to clone: clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{Guard, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Machine {
///     candies: u32,
/// }
///
/// impl State for Machine {
///     fn name(&self) -> &str {
///         "Machine"
///     }
/// }
///
/// let has_candy = Guard::new(|m: &Machine| m.candies > 0);
///
/// assert!(has_candy.check(&Machine { candies: 5 }));
/// assert!(!has_candy.check(&Machine { candies: 0 }));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// A guard that accepts every state.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Check if the guard allows a transition out of this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

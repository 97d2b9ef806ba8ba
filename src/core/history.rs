//! Committed-transition history.
//!
//! Every transition a machine commits is recorded here. Unhandled events and
//! blocked guards leave no trace.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which kind of edge carried a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// A build-time edge to a declared node.
    Strict,
    /// A guarded edge whose destination was computed from the live state.
    Guarded,
}

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{State, StateTransition, TransitionKind};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Door::Open,
///     to: Door::Closed,
///     timestamp: Utc::now(),
///     kind: TransitionKind::Strict,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
    /// The kind of edge that fired
    pub kind: TransitionKind,
}

/// Ordered history of committed transitions.
///
/// `record` consumes the history and returns it with the transition
/// appended, so a history value is never shared mid-update.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning the extended history.
    pub fn record(mut self, transition: StateTransition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first `from` state, then the `to` state of each
    /// transition, in order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use switchyard::core::{State, StateHistory, StateTransition, TransitionKind};
    /// use serde::{Deserialize, Serialize};
    /// use chrono::Utc;
    ///
    /// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    /// enum Phase { One, Two, Three }
    ///
    /// impl State for Phase {
    ///     fn name(&self) -> &str {
    ///         match self {
    ///             Self::One => "One",
    ///             Self::Two => "Two",
    ///             Self::Three => "Three",
    ///         }
    ///     }
    /// }
    ///
    /// let history = StateHistory::new()
    ///     .record(StateTransition {
    ///         from: Phase::One,
    ///         to: Phase::Two,
    ///         timestamp: Utc::now(),
    ///         kind: TransitionKind::Strict,
    ///     })
    ///     .record(StateTransition {
    ///         from: Phase::Two,
    ///         to: Phase::Three,
    ///         timestamp: Utc::now(),
    ///         kind: TransitionKind::Guarded,
    ///     });
    ///
    /// assert_eq!(history.get_path(), vec![&Phase::One, &Phase::Two, &Phase::Three]);
    /// ```
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Init,
        Running,
        Completed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Init => "Init",
                Self::Running => "Running",
                Self::Completed => "Completed",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Completed)
        }
    }

    fn transition(from: TestState, to: TestState, kind: TransitionKind) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            timestamp: Utc::now(),
            kind,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_appends_in_order() {
        let history = StateHistory::new()
            .record(transition(
                TestState::Init,
                TestState::Running,
                TransitionKind::Strict,
            ))
            .record(transition(
                TestState::Running,
                TestState::Completed,
                TransitionKind::Guarded,
            ));

        assert_eq!(history.len(), 2);
        assert_eq!(history.transitions()[0].kind, TransitionKind::Strict);
        assert_eq!(history.transitions()[1].kind, TransitionKind::Guarded);
        assert_eq!(
            history.get_path(),
            vec![&TestState::Init, &TestState::Running, &TestState::Completed]
        );
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(transition(
            TestState::Init,
            TestState::Running,
            TransitionKind::Strict,
        ));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(transition(
            TestState::Running,
            TestState::Completed,
            TransitionKind::Strict,
        ));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(transition(
            TestState::Init,
            TestState::Running,
            TransitionKind::Strict,
        ));

        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(transition(
            TestState::Init,
            TestState::Running,
            TransitionKind::Guarded,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.transitions()[0].to, TestState::Running);
        assert_eq!(deserialized.transitions()[0].kind, TransitionKind::Guarded);
    }
}

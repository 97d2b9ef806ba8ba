//! State machine driver.

use crate::core::{Event, State, StateHistory, StateTransition};
use crate::graph::{Graph, ListenerMode, Node, Position};
use chrono::Utc;
use uuid::Uuid;

/// Result of applying one event.
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyResult<S: State> {
    /// The machine moved; carries the new state.
    Transitioned(S),

    /// No edge matches the event. Nothing ran.
    Unhandled,

    /// A guarded edge matched but its precondition rejected the current state.
    Blocked,
}

impl<S: State> ApplyResult<S> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }
}

/// A sealed state machine.
///
/// The machine owns its graph and exactly one current position. `apply`
/// runs synchronously on the caller's thread, listeners included. It takes
/// `&mut self`, so a single owner can never race with itself; use
/// [`SharedStateMachine`](crate::runtime::SharedStateMachine) to share one
/// machine between threads.
pub struct StateMachine<S: State, E: Event> {
    id: Uuid,
    graph: Graph<S, E>,
    position: Position<S, E>,
    mode: ListenerMode,
    keep_history: bool,
    history: StateHistory<S>,
}

impl<S: State, E: Event> StateMachine<S, E> {
    pub(crate) fn new(graph: Graph<S, E>, mode: ListenerMode, keep_history: bool) -> Self {
        let position = Position::Declared(graph.entry());
        Self {
            id: Uuid::new_v4(),
            graph,
            position,
            mode,
            keep_history,
            history: StateHistory::new(),
        }
    }

    /// Identifier of this machine instance, used in log fields.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// State value of the current node (pure).
    pub fn state(&self) -> &S {
        self.current().state()
    }

    /// The current node (pure).
    pub fn current(&self) -> &Node<S, E> {
        self.position.resolve(&self.graph)
    }

    pub fn graph(&self) -> &Graph<S, E> {
        &self.graph
    }

    pub fn listener_mode(&self) -> ListenerMode {
        self.mode
    }

    /// Check if the machine is in a final state (pure).
    pub fn is_final(&self) -> bool {
        self.state().is_final()
    }

    /// Committed transitions so far (pure).
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// True if the current node has an edge for `event`. Guards are not
    /// evaluated.
    pub fn can_apply(&self, event: &E) -> bool {
        self.current().can_transition(event)
    }

    /// Apply one event.
    ///
    /// Events without a matching edge and guarded edges whose precondition
    /// fails are ignored; the current state is left untouched.
    pub fn apply(&mut self, event: &E) -> ApplyResult<S> {
        let current = self.position.resolve(&self.graph);
        if !current.can_transition(event) {
            tracing::trace!(
                machine = %self.id,
                state = current.state().name(),
                ?event,
                "no edge for event"
            );
            return ApplyResult::Unhandled;
        }

        let Some(next) = current.fire(&self.graph, event, self.mode) else {
            tracing::trace!(
                machine = %self.id,
                state = current.state().name(),
                ?event,
                "guard rejected transition"
            );
            return ApplyResult::Blocked;
        };

        let from = current.state().clone();
        let to = next.resolve(&self.graph).state().clone();
        let kind = next.kind();
        tracing::debug!(
            machine = %self.id,
            from = from.name(),
            to = to.name(),
            ?kind,
            "transition committed"
        );

        self.position = next;
        if self.keep_history {
            self.history = std::mem::take(&mut self.history).record(StateTransition {
                from,
                to: to.clone(),
                timestamp: Utc::now(),
                kind,
            });
        }
        ApplyResult::Transitioned(to)
    }

    /// Apply events in order; returns how many caused a transition.
    pub fn apply_all<'a, I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        events
            .into_iter()
            .filter(|event| self.apply(event).is_transitioned())
            .count()
    }
}

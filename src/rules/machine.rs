//! Rule-table machine.

use crate::core::{Event, EventKey, State, StateHistory, StateTransition, TransitionKind};
use crate::graph::{Listener, Transform};
use crate::runtime::ApplyResult;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

pub(crate) struct Rule<S: State, E: Event> {
    pub(crate) from: String,
    pub(crate) on: EventKey<E>,
    pub(crate) transform: Transform<S>,
}

impl<S: State, E: Event> Rule<S, E> {
    fn matches(&self, state: &S, event: &E) -> bool {
        self.from == state.name() && self.on.matches(event)
    }
}

/// A machine driven by a flat, ordered table of rules.
///
/// Unlike [`StateMachine`](crate::runtime::StateMachine) there is no node
/// graph: each event is checked against every rule in declaration order
/// and the first rule whose source name equals the current state's name
/// and whose key matches the event fires. Events no rule matches are
/// ignored.
pub struct RuleMachine<S: State, E: Event> {
    id: Uuid,
    state: S,
    rules: Vec<Rule<S, E>>,
    on_enter: HashMap<String, Vec<Listener<E>>>,
    on_exit: HashMap<String, Vec<Listener<E>>>,
    history: StateHistory<S>,
}

impl<S: State, E: Event> RuleMachine<S, E> {
    pub(crate) fn new(
        state: S,
        rules: Vec<Rule<S, E>>,
        on_enter: HashMap<String, Vec<Listener<E>>>,
        on_exit: HashMap<String, Vec<Listener<E>>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            rules,
            on_enter,
            on_exit,
            history: StateHistory::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    /// True if some rule would fire for `event` in the current state.
    pub fn can_apply(&self, event: &E) -> bool {
        self.rules.iter().any(|rule| rule.matches(&self.state, event))
    }

    /// Fire the first matching rule.
    ///
    /// Exit listeners of the current state's name run, then the rule's
    /// transform, then enter listeners of the new state's name.
    pub fn apply(&mut self, event: &E) -> ApplyResult<S> {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(&self.state, event)) else {
            tracing::trace!(
                machine = %self.id,
                state = self.state.name(),
                ?event,
                "no rule for event"
            );
            return ApplyResult::Unhandled;
        };

        notify(&self.on_exit, self.state.name(), event);
        let next = (rule.transform)(&self.state);
        notify(&self.on_enter, next.name(), event);

        tracing::debug!(
            machine = %self.id,
            from = self.state.name(),
            to = next.name(),
            "rule fired"
        );

        let from = std::mem::replace(&mut self.state, next.clone());
        self.history = std::mem::take(&mut self.history).record(StateTransition {
            from,
            to: next.clone(),
            timestamp: Utc::now(),
            kind: TransitionKind::Guarded,
        });
        ApplyResult::Transitioned(next)
    }
}

fn notify<E>(listeners: &HashMap<String, Vec<Listener<E>>>, state: &str, event: &E) {
    if let Some(listeners) = listeners.get(state) {
        listeners.iter().for_each(|listener| listener(event));
    }
}

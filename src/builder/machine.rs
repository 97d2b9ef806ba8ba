//! Builder for constructing state machines.

use crate::builder::error::{BuildError, DeclarationError};
use crate::core::{Event, EventKey, Guard, State};
use crate::graph::{inherit_declared, Graph, ListenerMode, Node};
use crate::runtime::StateMachine;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating one declaration.
pub(crate) type Check = Validation<(), NonEmptyVec<BuildError>>;

/// Fluent, single-use builder for a [`StateMachine`].
///
/// Nodes are fetched or created by state name: every call naming a state
/// with the same [`State::name`] refers to the same node. The entry node is
/// created from the initial state. No reachability or dead-state analysis
/// is done; any graph shape is accepted.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::StateMachineBuilder;
/// use switchyard::{event_enum, state_enum};
///
/// state_enum! {
///     enum Job {
///         Init,
///         Running,
///         Completed,
///     }
///     final: [Completed]
/// }
///
/// event_enum! {
///     enum Cmd {
///         Run,
///         End,
///     }
/// }
///
/// let mut machine = StateMachineBuilder::new(Job::Init)
///     .add_transition(Job::Init, Cmd::Run, Job::Running)
///     .add_transition(Job::Running, Cmd::End, Job::Completed)
///     .build()
///     .unwrap();
///
/// machine.apply(&Cmd::Run);
/// machine.apply(&Cmd::End);
/// assert_eq!(machine.state(), &Job::Completed);
/// assert!(machine.is_final());
/// ```
pub struct StateMachineBuilder<S: State, E: Event> {
    graph: Graph<S, E>,
    mode: ListenerMode,
    keep_history: bool,
    checks: Vec<Check>,
}

impl<S: State + 'static, E: Event + 'static> StateMachineBuilder<S, E> {
    /// Start a builder whose entry node holds `initial`.
    pub fn new(initial: S) -> Self {
        let checks = vec![check_state(&initial)];
        Self {
            graph: Graph::new(initial),
            mode: ListenerMode::default(),
            keep_history: true,
            checks,
        }
    }

    /// Choose when listeners run. Defaults to [`ListenerMode::Committed`].
    pub fn listener_mode(mut self, mode: ListenerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Do not record committed transitions in the machine's history.
    pub fn without_history(mut self) -> Self {
        self.keep_history = false;
        self
    }

    /// Add a strict edge `from --on--> to`.
    pub fn add_transition(mut self, from: S, on: impl Into<EventKey<E>>, to: S) -> Self {
        let on = on.into();
        self.checks.push(check_state(&from));
        self.checks.push(check_state(&to));
        self.checks.push(check_key(from.name(), &on));

        let from = self.graph.fetch_or_create(from);
        let to = self.graph.fetch_or_create(to);
        self.graph.node_mut(from).connect(to, on);
        self
    }

    /// Add a guarded edge: when `precondition` accepts the live state, move
    /// to `transform(state)`.
    ///
    /// The destination node inherits the edges and listeners declared for
    /// its state name.
    pub fn add_guarded_transition<T, P>(
        self,
        from: S,
        on: impl Into<EventKey<E>>,
        transform: T,
        precondition: P,
    ) -> Self
    where
        T: Fn(&S) -> S + Send + Sync + 'static,
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.add_lazy_transition(from, on, transform, Guard::new(precondition), inherit_declared)
    }

    /// Add an unconditional computed edge: always move to `transform(state)`.
    pub fn add_mapped_transition<T>(self, from: S, on: impl Into<EventKey<E>>, transform: T) -> Self
    where
        T: Fn(&S) -> S + Send + Sync + 'static,
    {
        self.add_lazy_transition(from, on, transform, Guard::always(), inherit_declared)
    }

    /// Add a guarded edge with an explicit post-create callback.
    ///
    /// `on_create` receives the freshly synthesized node and returns the
    /// node the machine moves into.
    pub fn add_lazy_transition<T, C>(
        mut self,
        from: S,
        on: impl Into<EventKey<E>>,
        transform: T,
        precondition: Guard<S>,
        on_create: C,
    ) -> Self
    where
        T: Fn(&S) -> S + Send + Sync + 'static,
        C: Fn(&Graph<S, E>, Node<S, E>) -> Node<S, E> + Send + Sync + 'static,
    {
        let on = on.into();
        self.checks.push(check_state(&from));
        self.checks.push(check_key(from.name(), &on));

        let from = self.graph.fetch_or_create(from);
        self.graph
            .node_mut(from)
            .add_lazy_transition(on, transform, precondition, on_create);
        self
    }

    /// Run `listener` with the triggering event whenever `state` is entered.
    pub fn on_enter<F>(mut self, state: S, listener: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.checks.push(check_state(&state));
        let id = self.graph.fetch_or_create(state);
        self.graph.node_mut(id).add_on_enter(Arc::new(listener));
        self
    }

    /// Run `listener` with the triggering event whenever `state` is left.
    pub fn on_exit<F>(mut self, state: S, listener: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.checks.push(check_state(&state));
        let id = self.graph.fetch_or_create(state);
        self.graph.node_mut(id).add_on_exit(Arc::new(listener));
        self
    }

    /// Event-agnostic variant of [`on_enter`](Self::on_enter).
    pub fn when_entered<F>(self, state: S, listener: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_enter(state, move |_: &E| listener())
    }

    /// Event-agnostic variant of [`on_exit`](Self::on_exit).
    pub fn when_exited<F>(self, state: S, listener: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_exit(state, move |_: &E| listener())
    }

    /// Seal the graph into a machine positioned at the entry node.
    ///
    /// Fails with every rejected declaration if any were found.
    pub fn build(self) -> Result<StateMachine<S, E>, DeclarationError> {
        match Validation::all_vec(self.checks) {
            Validation::Success(_) => {
                let machine = StateMachine::new(self.graph, self.mode, self.keep_history);
                tracing::debug!(
                    machine = %machine.id(),
                    nodes = machine.graph().len(),
                    entry = machine.state().name(),
                    mode = ?self.mode,
                    "state machine built"
                );
                Ok(machine)
            }
            Validation::Failure(errors) => Err(DeclarationError {
                errors: errors.iter().cloned().collect(),
            }),
        }
    }
}

pub(crate) fn check_state<S: State>(state: &S) -> Check {
    if state.name().is_empty() {
        Validation::fail(BuildError::UnnamedState {
            state: format!("{:?}", state),
        })
    } else {
        Validation::success(())
    }
}

pub(crate) fn check_key<E: Event>(from: &str, key: &EventKey<E>) -> Check {
    match key {
        EventKey::Class(class) if class.tag().is_empty() => {
            Validation::fail(BuildError::UntaggedEventClass {
                state: from.to_string(),
            })
        }
        _ => Validation::success(()),
    }
}

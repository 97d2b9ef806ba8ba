//! Graph vertices and their outgoing transition tables.

use crate::core::{Event, EventClass, EventKey, Guard, State};
use crate::graph::arena::{Graph, ListenerMode, Position};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback run on enter or exit, receiving the event that caused it.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Pure state transform of a guarded transition.
pub type Transform<S> = Arc<dyn Fn(&S) -> S + Send + Sync>;

/// Callback receiving a freshly synthesized node; returns the node to move into.
pub type OnCreate<S, E> = Arc<dyn Fn(&Graph<S, E>, Node<S, E>) -> Node<S, E> + Send + Sync>;

/// Handle of a declared node inside a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edges keyed by exact event or by event class.
///
/// Exact keys are looked up in O(1). Class keys are scanned in
/// registration order and the first match wins.
#[derive(Clone)]
struct EdgeTable<E, T> {
    exact: HashMap<E, T>,
    classes: Vec<(EventClass, T)>,
}

impl<E: Event, T: Clone> EdgeTable<E, T> {
    fn new() -> Self {
        Self {
            exact: HashMap::new(),
            classes: Vec::new(),
        }
    }

    /// Last write wins. A re-registered class keeps its original position.
    fn insert(&mut self, key: EventKey<E>, value: T) {
        match key {
            EventKey::Exact(event) => {
                self.exact.insert(event, value);
            }
            EventKey::Class(class) => {
                match self.classes.iter_mut().find(|(existing, _)| *existing == class) {
                    Some(entry) => entry.1 = value,
                    None => self.classes.push((class, value)),
                }
            }
        }
    }

    fn contains_key(&self, key: &EventKey<E>) -> bool {
        match key {
            EventKey::Exact(event) => self.exact.contains_key(event),
            EventKey::Class(class) => self.classes.iter().any(|(existing, _)| existing == class),
        }
    }

    fn find(&self, event: &E) -> Option<&T> {
        self.exact.get(event).or_else(|| {
            self.classes
                .iter()
                .find(|(class, _)| EventKey::<E>::Class(*class).matches(event))
                .map(|(_, value)| value)
        })
    }

    /// Copy in every entry of `other` whose key is not already present.
    fn absorb(&mut self, other: &Self) {
        for (event, value) in &other.exact {
            if !self.exact.contains_key(event) {
                self.exact.insert(event.clone(), value.clone());
            }
        }
        for (class, value) in &other.classes {
            if !self.classes.iter().any(|(existing, _)| existing == class) {
                self.classes.push((*class, value.clone()));
            }
        }
    }

    fn len(&self) -> usize {
        self.exact.len() + self.classes.len()
    }
}

/// A guarded edge: destination computed from the live state at fire time.
pub struct LazyTransition<S: State, E: Event> {
    transform: Transform<S>,
    precondition: Guard<S>,
    on_create: OnCreate<S, E>,
}

impl<S: State, E: Event> LazyTransition<S, E> {
    pub fn new(transform: Transform<S>, precondition: Guard<S>, on_create: OnCreate<S, E>) -> Self {
        Self {
            transform,
            precondition,
            on_create,
        }
    }

    pub fn precondition(&self) -> &Guard<S> {
        &self.precondition
    }

    /// Build the destination node for a departure from `from`.
    ///
    /// Does not consult the precondition.
    pub fn synthesize(&self, graph: &Graph<S, E>, from: &S) -> Node<S, E> {
        let fresh = Node::new((self.transform)(from));
        (self.on_create)(graph, fresh)
    }
}

impl<S: State, E: Event> Clone for LazyTransition<S, E> {
    fn clone(&self) -> Self {
        Self {
            transform: Arc::clone(&self.transform),
            precondition: self.precondition.clone(),
            on_create: Arc::clone(&self.on_create),
        }
    }
}

/// A vertex of the transition graph.
///
/// A node owns one state value, its strict and guarded outgoing edges, and
/// ordered enter and exit listeners. Edges and listeners are add-only.
pub struct Node<S: State, E: Event> {
    state: S,
    strict: EdgeTable<E, NodeId>,
    lazy: EdgeTable<E, LazyTransition<S, E>>,
    on_exit: Vec<Listener<E>>,
    on_enter: Vec<Listener<E>>,
}

impl<S: State, E: Event> Node<S, E> {
    /// A node with no edges and no listeners.
    pub fn new(state: S) -> Self {
        Self {
            state,
            strict: EdgeTable::new(),
            lazy: EdgeTable::new(),
            on_exit: Vec::new(),
            on_enter: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Register a strict edge to `to`. Replaces any strict edge under `key`.
    pub fn connect(&mut self, to: NodeId, key: EventKey<E>) {
        self.strict.insert(key, to);
    }

    /// Register a guarded edge. Replaces any guarded edge under `key`.
    pub fn add_lazy_transition<T, C>(
        &mut self,
        key: EventKey<E>,
        transform: T,
        precondition: Guard<S>,
        on_create: C,
    ) where
        T: Fn(&S) -> S + Send + Sync + 'static,
        C: Fn(&Graph<S, E>, Node<S, E>) -> Node<S, E> + Send + Sync + 'static,
    {
        let transition = LazyTransition::new(Arc::new(transform), precondition, Arc::new(on_create));
        self.lazy.insert(key, transition);
    }

    pub fn add_on_exit(&mut self, listener: Listener<E>) {
        self.on_exit.push(listener);
    }

    pub fn add_on_enter(&mut self, listener: Listener<E>) {
        self.on_enter.push(listener);
    }

    /// True if a strict or guarded edge matches `event`.
    ///
    /// Guard preconditions are not evaluated here.
    pub fn can_transition(&self, event: &E) -> bool {
        self.strict.find(event).is_some() || self.lazy.find(event).is_some()
    }

    /// Destination of the strict edge matching `event`.
    pub fn strict_target(&self, event: &E) -> Option<NodeId> {
        self.strict.find(event).copied()
    }

    /// The guarded edge matching `event`.
    pub fn lazy_transition(&self, event: &E) -> Option<&LazyTransition<S, E>> {
        self.lazy.find(event)
    }

    pub fn has_strict_edge(&self, key: &EventKey<E>) -> bool {
        self.strict.contains_key(key)
    }

    pub fn has_lazy_edge(&self, key: &EventKey<E>) -> bool {
        self.lazy.contains_key(key)
    }

    pub fn edge_count(&self) -> usize {
        self.strict.len() + self.lazy.len()
    }

    pub fn enter_listener_count(&self) -> usize {
        self.on_enter.len()
    }

    pub fn exit_listener_count(&self) -> usize {
        self.on_exit.len()
    }

    pub(crate) fn notify_exit(&self, event: &E) {
        self.on_exit.iter().for_each(|listener| listener(event));
    }

    pub(crate) fn notify_enter(&self, event: &E) {
        self.on_enter.iter().for_each(|listener| listener(event));
    }

    /// Apply `event` to this node.
    ///
    /// Strict edges take priority over guarded ones. A guarded edge whose
    /// precondition rejects the current state yields `None`. With
    /// [`ListenerMode::Committed`] listeners only run for a committed
    /// transition: exit listeners here, then enter listeners of the
    /// destination. With [`ListenerMode::Eager`] exit listeners run before
    /// any edge is resolved and synthesized destinations are not notified.
    pub fn fire(&self, graph: &Graph<S, E>, event: &E, mode: ListenerMode) -> Option<Position<S, E>> {
        let eager = mode == ListenerMode::Eager;
        if eager {
            self.notify_exit(event);
        }

        if let Some(id) = self.strict_target(event) {
            if !eager {
                self.notify_exit(event);
            }
            graph.node(id).notify_enter(event);
            return Some(Position::Declared(id));
        }

        let lazy = self.lazy_transition(event)?;
        if !lazy.precondition().check(&self.state) {
            return None;
        }
        if !eager {
            self.notify_exit(event);
        }
        let node = lazy.synthesize(graph, &self.state);
        if !eager {
            node.notify_enter(event);
        }
        Some(Position::Synthesized(Box::new(node)))
    }

    /// Merge this node's listeners and edges into `other` and return it.
    ///
    /// Listeners are appended after `other`'s own. Edges are copied only
    /// for keys `other` does not already have.
    pub fn merge_with(&self, mut other: Node<S, E>) -> Node<S, E> {
        other.on_enter.extend(self.on_enter.iter().cloned());
        other.on_exit.extend(self.on_exit.iter().cloned());
        other.strict.absorb(&self.strict);
        other.lazy.absorb(&self.lazy);
        other
    }
}

impl<S: State, E: Event> fmt::Debug for Node<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("state", &self.state)
            .field("strict_edges", &self.strict.len())
            .field("lazy_edges", &self.lazy.len())
            .field("on_enter", &self.on_enter.len())
            .field("on_exit", &self.on_exit.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};

    const TYPE_EVENT: EventClass = EventClass::root("TypeEvent");
    const RUN: EventClass = EventClass::extends("Run", &TYPE_EVENT);

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Job {
        Init,
        Running(u32),
        Completed,
    }

    impl State for Job {
        fn name(&self) -> &str {
            match self {
                Self::Init => "Init",
                Self::Running(_) => "Running",
                Self::Completed => "Completed",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Cmd {
        Start,
        Finish,
        Run(u32),
    }

    impl Event for Cmd {
        fn class(&self) -> Option<EventClass> {
            match self {
                Self::Run(_) => Some(RUN),
                _ => None,
            }
        }
    }

    fn keep(_: &Graph<Job, Cmd>, node: Node<Job, Cmd>) -> Node<Job, Cmd> {
        node
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &str) -> Listener<Cmd> {
        let log = Arc::clone(log);
        let label = label.to_string();
        Arc::new(move |_: &Cmd| log.lock().push(label.clone()))
    }

    #[test]
    fn connect_overwrites_previous_edge() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let running = graph.fetch_or_create(Job::Running(0));
        let completed = graph.fetch_or_create(Job::Completed);

        let mut node = Node::new(Job::Init);
        node.connect(running, Cmd::Start.into());
        node.connect(completed, Cmd::Start.into());

        assert_eq!(node.strict_target(&Cmd::Start), Some(completed));
        assert_eq!(node.edge_count(), 1);
    }

    #[test]
    fn lazy_transition_overwrites_previous_guarded_edge() {
        let graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let mut node = Node::new(Job::Init);
        node.add_lazy_transition(Cmd::Start.into(), |_| Job::Running(1), Guard::always(), keep);
        node.add_lazy_transition(Cmd::Start.into(), |_| Job::Running(2), Guard::always(), keep);

        let transition = node.lazy_transition(&Cmd::Start).unwrap();
        assert_eq!(transition.synthesize(&graph, &Job::Init).state(), &Job::Running(2));
        assert_eq!(node.edge_count(), 1);
    }

    #[test]
    fn can_transition_ignores_guards() {
        let mut node: Node<Job, Cmd> = Node::new(Job::Init);
        node.add_lazy_transition(
            Cmd::Start.into(),
            |_| Job::Running(0),
            Guard::new(|_| false),
            keep,
        );

        assert!(node.can_transition(&Cmd::Start));
        assert!(!node.can_transition(&Cmd::Finish));
    }

    #[test]
    fn can_transition_matches_classes() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let running = graph.fetch_or_create(Job::Running(0));
        let mut node = Node::new(Job::Init);
        node.connect(running, EventKey::Class(TYPE_EVENT));

        assert!(node.can_transition(&Cmd::Run(5)));
        assert!(!node.can_transition(&Cmd::Start));
    }

    #[test]
    fn first_registered_class_wins() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let running = graph.fetch_or_create(Job::Running(0));
        let completed = graph.fetch_or_create(Job::Completed);

        let mut node = Node::new(Job::Init);
        node.connect(running, EventKey::Class(TYPE_EVENT));
        node.connect(completed, EventKey::Class(RUN));

        assert_eq!(node.strict_target(&Cmd::Run(1)), Some(running));
    }

    #[test]
    fn exact_edge_beats_class_edge() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let running = graph.fetch_or_create(Job::Running(0));
        let completed = graph.fetch_or_create(Job::Completed);

        let mut node = Node::new(Job::Init);
        node.connect(running, EventKey::Class(RUN));
        node.connect(completed, Cmd::Run(9).into());

        assert_eq!(node.strict_target(&Cmd::Run(9)), Some(completed));
        assert_eq!(node.strict_target(&Cmd::Run(1)), Some(running));
    }

    #[test]
    fn strict_edge_beats_guarded_edge() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let completed = graph.fetch_or_create(Job::Completed);
        let entry = graph.entry();
        graph.node_mut(entry).connect(completed, Cmd::Start.into());
        graph.node_mut(entry).add_lazy_transition(
            Cmd::Start.into(),
            |_| Job::Running(3),
            Guard::always(),
            keep,
        );

        let fired = graph.node(entry).fire(&graph, &Cmd::Start, ListenerMode::Committed);
        assert!(matches!(fired, Some(Position::Declared(id)) if id == completed));
    }

    #[test]
    fn guarded_fire_synthesizes_from_live_state() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Running(4));
        let entry = graph.entry();
        graph.node_mut(entry).add_lazy_transition(
            Cmd::Start.into(),
            |job| match job {
                Job::Running(n) => Job::Running(n + 1),
                other => other.clone(),
            },
            Guard::always(),
            keep,
        );

        let fired = graph.node(entry).fire(&graph, &Cmd::Start, ListenerMode::Committed);
        match fired {
            Some(Position::Synthesized(node)) => {
                assert_eq!(node.state(), &Job::Running(5));
                assert_eq!(node.edge_count(), 0);
                assert_eq!(node.enter_listener_count(), 0);
            }
            other => panic!("expected synthesized node, got {:?}", other),
        }
    }

    #[test]
    fn rejected_guard_yields_nothing() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let entry = graph.entry();
        graph.node_mut(entry).add_lazy_transition(
            Cmd::Start.into(),
            |_| Job::Running(0),
            Guard::new(|_| false),
            keep,
        );

        assert!(graph
            .node(entry)
            .fire(&graph, &Cmd::Start, ListenerMode::Committed)
            .is_none());
    }

    #[test]
    fn committed_mode_skips_exit_listeners_on_rejected_guard() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let entry = graph.entry();
        graph.node_mut(entry).add_on_exit(recorder(&log, "exit"));
        graph.node_mut(entry).add_lazy_transition(
            Cmd::Start.into(),
            |_| Job::Running(0),
            Guard::new(|_| false),
            keep,
        );

        graph.node(entry).fire(&graph, &Cmd::Start, ListenerMode::Committed);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn eager_mode_runs_exit_listeners_on_rejected_guard() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let entry = graph.entry();
        graph.node_mut(entry).add_on_exit(recorder(&log, "exit"));
        graph.node_mut(entry).add_lazy_transition(
            Cmd::Start.into(),
            |_| Job::Running(0),
            Guard::new(|_| false),
            keep,
        );

        let fired = graph.node(entry).fire(&graph, &Cmd::Start, ListenerMode::Eager);
        assert!(fired.is_none());
        assert_eq!(*log.lock(), vec!["exit".to_string()]);
    }

    #[test]
    fn exit_listeners_run_before_enter_listeners() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let entry = graph.entry();
        let running = graph.fetch_or_create(Job::Running(0));
        graph.node_mut(entry).add_on_exit(recorder(&log, "exit-1"));
        graph.node_mut(entry).add_on_exit(recorder(&log, "exit-2"));
        graph.node_mut(running).add_on_enter(recorder(&log, "enter-1"));
        graph.node_mut(running).add_on_enter(recorder(&log, "enter-2"));
        graph.node_mut(entry).connect(running, Cmd::Start.into());

        graph.node(entry).fire(&graph, &Cmd::Start, ListenerMode::Committed);
        assert_eq!(*log.lock(), vec!["exit-1", "exit-2", "enter-1", "enter-2"]);
    }

    #[test]
    fn merge_with_keeps_other_edges_for_shared_keys() {
        let mut graph: Graph<Job, Cmd> = Graph::new(Job::Init);
        let running = graph.fetch_or_create(Job::Running(0));
        let completed = graph.fetch_or_create(Job::Completed);

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut template = Node::new(Job::Running(0));
        template.connect(completed, Cmd::Finish.into());
        template.connect(completed, Cmd::Start.into());
        template.add_on_enter(recorder(&log, "template-enter"));
        template.add_on_exit(recorder(&log, "template-exit"));

        let mut fresh = Node::new(Job::Running(7));
        fresh.connect(running, Cmd::Start.into());
        fresh.add_on_enter(recorder(&log, "fresh-enter"));

        let merged = template.merge_with(fresh);

        assert_eq!(merged.state(), &Job::Running(7));
        assert_eq!(merged.strict_target(&Cmd::Start), Some(running));
        assert_eq!(merged.strict_target(&Cmd::Finish), Some(completed));
        assert_eq!(merged.enter_listener_count(), 2);
        assert_eq!(merged.exit_listener_count(), 1);

        merged.notify_enter(&Cmd::Start);
        assert_eq!(*log.lock(), vec!["fresh-enter", "template-enter"]);
    }

    #[test]
    fn merge_with_copies_guarded_edges() {
        let mut template: Node<Job, Cmd> = Node::new(Job::Running(0));
        template.add_lazy_transition(Cmd::Finish.into(), |_| Job::Completed, Guard::always(), keep);

        let merged = template.merge_with(Node::new(Job::Running(1)));

        assert!(merged.has_lazy_edge(&Cmd::Finish.into()));
        assert!(merged.can_transition(&Cmd::Finish));
    }
}

//! Node arena, positions inside it, and listener ordering policy.

use crate::core::{Event, State, TransitionKind};
use crate::graph::node::{Node, NodeId};
use std::collections::HashMap;

/// When enter and exit listeners run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerMode {
    /// Listeners run only for a committed transition: exit listeners of the
    /// departing node, then enter listeners of the arriving node.
    #[default]
    Committed,
    /// Exit listeners run as soon as an edge exists for the event, even if
    /// its guard then rejects the transition. Synthesized destinations are
    /// not notified on entry.
    Eager,
}

/// Where a machine currently is.
#[derive(Debug)]
pub enum Position<S: State, E: Event> {
    /// A node declared at build time.
    Declared(NodeId),
    /// A node synthesized by a guarded transition, owned by the machine.
    Synthesized(Box<Node<S, E>>),
}

impl<S: State, E: Event> Position<S, E> {
    pub fn resolve<'a>(&'a self, graph: &'a Graph<S, E>) -> &'a Node<S, E> {
        match self {
            Self::Declared(id) => graph.node(*id),
            Self::Synthesized(node) => node.as_ref(),
        }
    }

    /// Kind of edge that leads to this position.
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Declared(_) => TransitionKind::Strict,
            Self::Synthesized(_) => TransitionKind::Guarded,
        }
    }
}

/// Arena of declared nodes, deduplicated by state name.
///
/// The entry node is always at index zero.
#[derive(Debug)]
pub struct Graph<S: State, E: Event> {
    nodes: Vec<Node<S, E>>,
    index: HashMap<String, NodeId>,
}

impl<S: State, E: Event> Graph<S, E> {
    /// A graph holding only the entry node.
    pub fn new(entry: S) -> Self {
        let mut index = HashMap::new();
        index.insert(entry.name().to_string(), NodeId(0));
        Self {
            nodes: vec![Node::new(entry)],
            index,
        }
    }

    pub fn entry(&self) -> NodeId {
        NodeId(0)
    }

    /// Panics if `id` was issued by another graph.
    pub fn node(&self, id: NodeId) -> &Node<S, E> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<S, E> {
        &mut self.nodes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node_named(&self, name: &str) -> Option<&Node<S, E>> {
        self.find(name).map(|id| self.node(id))
    }

    /// The node for `state`'s name, created from `state` on first sight.
    ///
    /// Later calls with a same-named state return the existing node and
    /// leave its state value untouched.
    pub fn fetch_or_create(&mut self, state: S) -> NodeId {
        if let Some(id) = self.find(state.name()) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(state.name().to_string(), id);
        self.nodes.push(Node::new(state));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<S, E>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}

/// Post-create callback that gives a synthesized node the edges and
/// listeners declared for its state name.
///
/// Nodes whose name was never declared are returned unchanged.
pub fn inherit_declared<S: State, E: Event>(graph: &Graph<S, E>, fresh: Node<S, E>) -> Node<S, E> {
    match graph.node_named(fresh.state().name()) {
        Some(declared) => declared.merge_with(fresh),
        None => fresh,
    }
}

//! The transition graph.
//!
//! Declared nodes live in a [`Graph`] arena and are addressed by [`NodeId`].
//! Nodes synthesized by guarded transitions are owned by the machine that
//! fired them and never enter the arena.

mod arena;
mod node;

pub use arena::{inherit_declared, Graph, ListenerMode, Position};
pub use node::{LazyTransition, Listener, Node, NodeId, OnCreate, Transform};

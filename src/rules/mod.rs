//! Rule-table machines.
//!
//! A lighter alternative to the node graph: transitions are an ordered list
//! of `(state name, event key) -> transform` rules checked against the live
//! state on every event.

mod builder;
mod machine;

pub use builder::RuleMachineBuilder;
pub use machine::RuleMachine;

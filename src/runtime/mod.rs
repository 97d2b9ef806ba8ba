//! Running machines.
//!
//! A [`StateMachine`] is sealed by a builder and owns its graph. Events are
//! applied one at a time, on the caller's thread.

mod machine;
mod shared;

pub use machine::{ApplyResult, StateMachine};
pub use shared::SharedStateMachine;

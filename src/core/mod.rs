//! Core value types shared by every machine.
//!
//! - States via the `State` trait
//! - Events, event classes and the edge-key classifier
//! - Guard predicates for guarded transitions
//! - History of committed transitions
//!
//! Nothing in this module performs side effects.

mod event;
mod guard;
mod history;
mod state;

pub use event::{Event, EventClass, EventKey};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, TransitionKind};
pub use state::State;

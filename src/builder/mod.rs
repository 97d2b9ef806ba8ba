//! Builder API for declaring state machines.
//!
//! A machine is declared as a fluent sequence of transitions and listeners,
//! then sealed with `build()`. Macros cover the common case of plain
//! unit-variant state and event enums.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, DeclarationError};
pub use machine::StateMachineBuilder;

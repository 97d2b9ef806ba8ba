//! Switchyard: a small, generic finite-state-machine library
//!
//! A machine is declared once with a fluent builder, sealed, and then driven
//! by applying events one at a time. Transitions come in two kinds:
//!
//! - **Strict** edges jump to a node fixed at build time.
//! - **Guarded** edges check a precondition against the live state and
//!   compute the next state from it, so states can carry payload.
//!
//! Events are matched either exactly or by a declared [`EventClass`], which
//! lets one edge accept a whole family of polymorphic events.
//!
//! # Core Concepts
//!
//! - **State**: node identity via the `State` trait's `name()`
//! - **Event**: enumerated or class-tagged inputs via the `Event` trait
//! - **Listeners**: enter and exit callbacks parameterized by the event
//! - **History**: record of committed transitions
//!
//! # Example
//!
//! ```rust
//! use switchyard::{event_enum, State, StateMachineBuilder};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum Turnstile {
//!     Locked { coins: u32 },
//!     Unlocked { coins: u32 },
//! }
//!
//! impl State for Turnstile {
//!     fn name(&self) -> &str {
//!         match self {
//!             Self::Locked { .. } => "Locked",
//!             Self::Unlocked { .. } => "Unlocked",
//!         }
//!     }
//! }
//!
//! event_enum! {
//!     enum Input {
//!         Coin,
//!         Push,
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new(Turnstile::Locked { coins: 0 })
//!     .add_mapped_transition(Turnstile::Locked { coins: 0 }, Input::Coin, |s| match s {
//!         Turnstile::Locked { coins } => Turnstile::Unlocked { coins: coins + 1 },
//!         other => other.clone(),
//!     })
//!     .add_mapped_transition(Turnstile::Unlocked { coins: 0 }, Input::Push, |s| match s {
//!         Turnstile::Unlocked { coins } => Turnstile::Locked { coins: *coins },
//!         other => other.clone(),
//!     })
//!     .build()
//!     .unwrap();
//!
//! machine.apply(&Input::Push);
//! machine.apply(&Input::Coin);
//! machine.apply(&Input::Push);
//! assert_eq!(machine.state(), &Turnstile::Locked { coins: 1 });
//! ```

pub mod builder;
pub mod core;
pub mod graph;
pub mod rules;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, DeclarationError, StateMachineBuilder};
pub use core::{Event, EventClass, EventKey, Guard, State, StateHistory, StateTransition};
pub use graph::ListenerMode;
pub use runtime::{ApplyResult, SharedStateMachine, StateMachine};

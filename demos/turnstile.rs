//! Candy Turnstile
//!
//! A coin-operated turnstile that dispenses one candy per turn. The states
//! carry payload, so the coin and turn edges are guarded transitions that
//! compute the next state from the live one.
//!
//! Key concepts:
//! - Payload-carrying states matched by name
//! - Guarded transitions that block when the machine runs out of candy
//! - Structured logging of every transition
//!
//! Run with: RUST_LOG=switchyard=debug cargo run --example turnstile

use serde::{Deserialize, Serialize};
use switchyard::{event_enum, ApplyResult, State, StateMachineBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
enum Turnstile {
    Locked { coins: u32, candies: u32 },
    Unlocked { coins: u32, candies: u32 },
}

impl Turnstile {
    fn coins(&self) -> u32 {
        match *self {
            Self::Locked { coins, .. } | Self::Unlocked { coins, .. } => coins,
        }
    }

    fn candies(&self) -> u32 {
        match *self {
            Self::Locked { candies, .. } | Self::Unlocked { candies, .. } => candies,
        }
    }
}

impl State for Turnstile {
    fn name(&self) -> &str {
        match self {
            Self::Locked { .. } => "Locked",
            Self::Unlocked { .. } => "Unlocked",
        }
    }
}

event_enum! {
    enum Input {
        Coin,
        Turn,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Candy Turnstile ===\n");

    let locked = Turnstile::Locked { coins: 0, candies: 0 };
    let unlocked = Turnstile::Unlocked { coins: 0, candies: 0 };

    let mut machine = StateMachineBuilder::new(Turnstile::Locked { coins: 10, candies: 2 })
        .add_guarded_transition(
            locked,
            Input::Coin,
            |s| Turnstile::Unlocked {
                coins: s.coins() + 1,
                candies: s.candies(),
            },
            |s| s.candies() > 0,
        )
        .add_mapped_transition(unlocked, Input::Turn, |s| Turnstile::Locked {
            coins: s.coins(),
            candies: s.candies().saturating_sub(1),
        })
        .add_mapped_transition(locked, Input::Turn, |s| *s)
        .add_mapped_transition(unlocked, Input::Coin, |s| *s)
        .on_exit(unlocked, |event| println!("  leaving Unlocked on {:?}", event))
        .build()
        .unwrap();

    println!("Initial state: {:?}\n", machine.state());

    use Input::{Coin, Turn};
    for event in [Coin, Turn, Coin, Turn, Coin, Turn] {
        match machine.apply(&event) {
            ApplyResult::Transitioned(state) => println!("{:?} -> {:?}", event, state),
            ApplyResult::Blocked => println!("{:?} rejected: out of candy", event),
            ApplyResult::Unhandled => println!("{:?} ignored", event),
        }
    }

    println!("\nFinal state: {:?}", machine.state());
    println!("Transitions committed: {}", machine.history().len());

    println!("\n=== Example Complete ===");
}

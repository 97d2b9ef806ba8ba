//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic strict transitions (states repeat)
//! - Unit-variant states and events from macros
//! - Enter listeners reporting each change
//!
//! Run with: cargo run --example traffic_light

use switchyard::{event_enum, state_enum, StateMachineBuilder};

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

event_enum! {
    enum Signal {
        Timer,
    }
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine = StateMachineBuilder::new(TrafficLight::Red)
        .add_transition(TrafficLight::Red, Signal::Timer, TrafficLight::Green)
        .add_transition(TrafficLight::Green, Signal::Timer, TrafficLight::Yellow)
        .add_transition(TrafficLight::Yellow, Signal::Timer, TrafficLight::Red)
        .when_entered(TrafficLight::Green, || println!("  Go!"))
        .when_entered(TrafficLight::Yellow, || println!("  Caution"))
        .when_entered(TrafficLight::Red, || println!("  Stop"))
        .build()
        .unwrap();

    println!("Initial state: {:?}\n", machine.state());

    println!("Transition sequence:");
    for _ in 0..6 {
        machine.apply(&Signal::Timer);
        println!("  -> {:?}", machine.state());
    }

    println!("\nThis is a cyclic state machine - the sequence repeats.");
    println!("Path: {:?}", machine.history().get_path());

    println!("\n=== Example Complete ===");
}

//! Traffic Light State Machine
//!
//! This example demonstrates path walking on a cyclic machine.
//!
//! Key concepts:
//! - Asking for a target state instead of firing single events
//! - Multi-hop walks through a cycle
//! - Entry actions and event listeners observing each hop
//! - Falling back to an error state when a target is unreachable
//!
//! Run with: cargo run --example traffic_light

use waypoint::core::State;
use waypoint::engine::{StateDefinition, StateMachine};
use waypoint::{event_enum, state_enum};

state_enum! {
    enum TrafficLight {
        Red,
        Green,
        Yellow,
        Blackout,
        Fault,
    }
    error: [Fault]
}

event_enum! {
    enum Signal {
        Go,
        Slow,
        Stop,
    }
}

/// Number of cycles completed, carried from light to light.
type Cycles = u32;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine: StateMachine<TrafficLight, Signal, Cycles> =
        StateMachine::builder(TrafficLight::Red, Some(0))
            .state(
                StateDefinition::builder(TrafficLight::Red)
                    .transition(Signal::Go, TrafficLight::Green)
                    .logic(|cycles, _machine| {
                        if let Some(cycles) = cycles {
                            *cycles += 1;
                        }
                        Ok(None)
                    })
                    .build(),
            )
            .state(
                StateDefinition::builder(TrafficLight::Green)
                    .transition(Signal::Slow, TrafficLight::Yellow)
                    .build(),
            )
            .state(
                StateDefinition::builder(TrafficLight::Yellow)
                    .transition(Signal::Stop, TrafficLight::Red)
                    .build(),
            )
            .state(StateDefinition::new(TrafficLight::Blackout))
            .error_state(StateDefinition::new(TrafficLight::Fault))
            .event_listener(Signal::Stop, |_| {
                println!("  [signal] Stop");
                Ok(())
            })
            .state_change_listener(|light, _| {
                println!("  [light] now {}", light.name());
                Ok(())
            })
            .build()
            .expect("traffic light configuration is valid");

    println!("Machine {} starts at {:?}\n", machine.id(), machine.current_state());

    println!("Going to Yellow (two hops):");
    let report = machine
        .go_to_state(TrafficLight::Yellow)
        .expect("walk succeeds");
    println!("  path: {:?}\n", report.path());

    println!("Going to Green (through Red again):");
    machine
        .go_to_state(TrafficLight::Green)
        .expect("walk succeeds");
    println!(
        "  cycles counted on Green: {:?}\n",
        machine.state_context(&TrafficLight::Green)
    );

    println!("Going to Blackout (no edge leads there):");
    let report = machine
        .go_to_state(TrafficLight::Blackout)
        .expect("fallback succeeds");
    println!(
        "  fell back: {}, now at {:?}\n",
        report.is_fallback(),
        machine.current_state()
    );

    println!("History:");
    for transition in machine.history().transitions() {
        println!(
            "  {:?} -> {:?} via {:?}",
            transition.from, transition.to, transition.event
        );
    }

    println!("\n=== Example Complete ===");
}

//! Ring Oscillator
//!
//! This demo wires a single inverter machine back onto itself.
//!
//! Key concepts:
//! - Self-loops (a machine consuming its own published output)
//! - Cyclic wiring without special cases
//! - One flip per round: the inverter reads the output it published in the
//!   previous round
//!
//! Run with: cargo run --example ring_oscillator

use lockstep::{BitVector, Network};

fn main() {
    println!("=== Ring Oscillator ===\n");

    let mut network = Network::new();

    // One input bit, one state bit: next state is the complement of the
    // input, output mirrors state.
    let inverter = network
        .create_simple(1, 1, |input: &BitVector, _state: &BitVector| {
            let mut next = BitVector::zeroed(1);
            next.set(0, input.get(0) == Some(false));
            next
        })
        .expect("inverter machine");

    // Close the ring: output bit 0 feeds input bit 0 of the same machine.
    network
        .connect(inverter, 0, inverter, 0, 1)
        .expect("self-loop wiring");

    println!("Inverter wired to itself; initial output: {}", network.output(inverter).unwrap());
    println!();

    for round in 1..=6 {
        network.step(&[inverter]).expect("step");
        println!(
            "round {round}: output = {}",
            network.output(inverter).unwrap()
        );
    }

    println!();
    println!("Each round the inverter reads its own previous output and");
    println!("publishes the complement, so the signal toggles once per round.");

    println!("\n=== Demo Complete ===");
}

//! Shift Register
//!
//! This demo chains copy machines behind a toggling source and watches a
//! wavefront move through them.
//!
//! Key concepts:
//! - Chained wiring built programmatically
//! - Synchronous lag: each stage holds the previous round's value of the
//!   stage before it
//! - Stepping a whole batch in one call
//!
//! Run with: cargo run --example shift_register

use lockstep::{AutomatonId, BitVector, Network};

const STAGES: usize = 4;

fn main() {
    println!("=== Shift Register ===\n");

    let mut network = Network::new();

    // The source flips its single state bit every round.
    let source = network
        .create_simple(0, 1, |_input: &BitVector, state: &BitVector| {
            let mut next = BitVector::zeroed(1);
            next.set(0, state.get(0) == Some(false));
            next
        })
        .expect("source machine");

    // Each stage copies its input into its state.
    let mut batch: Vec<AutomatonId> = vec![source];
    let mut previous = source;
    for _ in 0..STAGES {
        let stage = network
            .create_simple(1, 1, |input: &BitVector, _state: &BitVector| input.clone())
            .expect("stage machine");
        network
            .connect(stage, 0, previous, 0, 1)
            .expect("stage wiring");
        batch.push(stage);
        previous = stage;
    }

    println!("source -> stage 1 -> stage 2 -> stage 3 -> stage 4\n");
    println!("round | source | stages");
    println!("------+--------+-------");

    for round in 1..=8 {
        network.step(&batch).expect("step");

        let stages: String = batch[1..]
            .iter()
            .map(|&stage| network.output(stage).unwrap().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{round:>5} | {}      | {stages}",
            network.output(source).unwrap()
        );
    }

    println!();
    println!("The source's square wave enters stage 1 one round late and");
    println!("shifts right by exactly one stage per round.");

    println!("\n=== Demo Complete ===");
}

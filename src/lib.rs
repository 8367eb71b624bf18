//! Lockstep: a Moore-machine network simulator
//!
//! Lockstep composes Moore finite-state machines (synchronous digital
//! logic blocks with fixed input, output, and state bit widths) into a
//! dynamically wired graph and advances them in lock-step. Wiring connects
//! output bits to input bits in any shape, cycles and self-loops included,
//! and a step gives every machine the previous round's outputs, never a
//! sibling's freshly computed value.
//!
//! # Core Concepts
//!
//! - **BitVector**: packed fixed-length boolean storage shared by states,
//!   inputs, and outputs
//! - **Logic**: the pure behavior of one machine kind, a transition
//!   function and an output function over bit-vectors
//! - **Network**: the arena that owns machines, their wiring, and the
//!   synchronous step scheduler
//!
//! # Example
//!
//! ```rust
//! use lockstep::{bits, BitVector, Network};
//!
//! let mut network = Network::new();
//!
//! // One-bit machine that flips its state every round; output = state.
//! let flipper = network
//!     .create_simple(0, 1, |_input: &BitVector, state: &BitVector| {
//!         let mut next = BitVector::zeroed(1);
//!         next.set(0, state.get(0) == Some(false));
//!         next
//!     })
//!     .unwrap();
//!
//! // One-bit machine that copies its input into its state.
//! let copier = network
//!     .create_simple(1, 1, |input: &BitVector, _state: &BitVector| input.clone())
//!     .unwrap();
//!
//! // Wire the flipper's output bit 0 to the copier's input bit 0.
//! network.connect(copier, 0, flipper, 0, 1).unwrap();
//!
//! network.step(&[flipper, copier]).unwrap();
//! assert_eq!(*network.output(flipper).unwrap(), bits![1]);
//! assert_eq!(*network.output(copier).unwrap(), bits![0]);
//!
//! network.step(&[flipper, copier]).unwrap();
//! assert_eq!(*network.output(flipper).unwrap(), bits![0]);
//! assert_eq!(*network.output(copier).unwrap(), bits![1]);
//! ```

pub mod bits;
pub mod logic;
pub mod network;

// Re-export commonly used types
pub use bits::BitVector;
pub use logic::{FnLogic, Logic};
pub use network::{AutomatonId, ErrorKind, Network, NetworkError, Port};

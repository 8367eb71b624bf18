//! A dynamically wired network of Moore machines.
//!
//! [`Network`] owns every automaton in a slot arena and addresses them by
//! [`AutomatonId`], a generational index, so a handle to a removed machine
//! can never reach a recycled slot. Machines are wired output-bit to
//! input-bit in any shape, cycles and self-loops included, and advanced in
//! lock-step by [`step`](Network::step): within one round every machine sees
//! the previous round's outputs, never a sibling's freshly computed value.
//!
//! # Example
//!
//! ```rust
//! use lockstep::{bits, BitVector, Network};
//!
//! let mut network = Network::new();
//!
//! // A one-bit machine that flips its state every round.
//! let blinker = network
//!     .create_simple(0, 1, |_input, state| {
//!         let mut next = BitVector::zeroed(1);
//!         next.set(0, state.get(0) == Some(false));
//!         next
//!     })
//!     .unwrap();
//!
//! // A one-bit machine that latches its input.
//! let follower = network
//!     .create_simple(1, 1, |input: &BitVector, _state: &BitVector| input.clone())
//!     .unwrap();
//!
//! network.connect(follower, 0, blinker, 0, 1).unwrap();
//!
//! network.step(&[blinker, follower]).unwrap();
//! assert_eq!(*network.output(blinker).unwrap(), bits![1]);
//! assert_eq!(*network.output(follower).unwrap(), bits![0]); // one round behind
//!
//! network.step(&[blinker, follower]).unwrap();
//! assert_eq!(*network.output(blinker).unwrap(), bits![0]);
//! assert_eq!(*network.output(follower).unwrap(), bits![1]);
//! ```

use crate::bits::BitVector;
use crate::logic::{FnLogic, Logic};
use serde::{Deserialize, Serialize};
use std::mem;

mod automaton;
mod edges;
pub mod error;

pub use error::{ErrorKind, NetworkError, Port};

use automaton::{Automaton, Tap};
use error::check_range;

/// Handle to an automaton inside a [`Network`].
///
/// Handles are generational: removing an automaton invalidates its handle
/// even if the slot is later reused, so operations on a stale handle report
/// [`NetworkError::StaleHandle`] instead of touching an unrelated machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct AutomatonId {
    index: u32,
    generation: u32,
}

impl AutomatonId {
    #[cfg(test)]
    pub(crate) fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

struct Slot {
    generation: u32,
    automaton: Option<Automaton>,
}

/// A network of interconnected Moore machines advanced in lock-step.
#[derive(Default)]
pub struct Network {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    rounds: u64,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully configured machine.
    ///
    /// `inputs` may be zero; `outputs` and `states` must not be. The state
    /// is seeded from `initial_state` (which must be exactly `states` bits
    /// wide) and the output is computed immediately, so it is observable
    /// before the first step. Creation is atomic: on any error nothing is
    /// added to the network.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::{bits, FnLogic, Network};
    ///
    /// let mut network = Network::new();
    /// let constant = network
    ///     .create_full(
    ///         0,
    ///         2,
    ///         2,
    ///         FnLogic::new(|_input, state| state.clone(), |state| state.clone()),
    ///         &bits![1, 0],
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(*network.output(constant).unwrap(), bits![1, 0]);
    /// ```
    pub fn create_full(
        &mut self,
        inputs: usize,
        outputs: usize,
        states: usize,
        logic: impl Logic + 'static,
        initial_state: &BitVector,
    ) -> Result<AutomatonId, NetworkError> {
        if outputs == 0 {
            return Err(NetworkError::NoOutputs);
        }
        if states == 0 {
            return Err(NetworkError::NoStates);
        }
        if initial_state.len() != states {
            return Err(NetworkError::WidthMismatch {
                expected: states,
                got: initial_state.len(),
            });
        }

        let mut automaton = Automaton::new(inputs, outputs, states, Box::new(logic))?;
        automaton.state.copy_words_from(initial_state);
        automaton.refresh_output();

        self.insert(automaton)
    }

    /// Create a machine whose output mirrors its state bit-for-bit.
    ///
    /// Convenience form of [`create_full`](Self::create_full) with as many
    /// output bits as state bits, the identity output function, and an
    /// all-zero initial state.
    pub fn create_simple<T>(
        &mut self,
        inputs: usize,
        states: usize,
        transition: T,
    ) -> Result<AutomatonId, NetworkError>
    where
        T: Fn(&BitVector, &BitVector) -> BitVector + Send + Sync + 'static,
    {
        if states == 0 {
            return Err(NetworkError::NoStates);
        }
        let initial_state = BitVector::try_zeroed(states)?;
        self.create_full(
            inputs,
            states,
            states,
            FnLogic::mirrored(transition),
            &initial_state,
        )
    }

    /// Wire `count` output bits of `source`, starting at `output_start`,
    /// to `count` input bits of `target`, starting at `input_start`.
    ///
    /// Input bits already connected are disconnected first, so reconnecting
    /// a slice never leaks a stale back-edge. `target` and `source` may be
    /// the same machine. All arguments are validated before any rewiring.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::{BitVector, Network};
    ///
    /// let mut network = Network::new();
    /// let a = network
    ///     .create_simple(0, 4, |_input, state| state.clone())
    ///     .unwrap();
    /// let b = network
    ///     .create_simple(4, 4, |input: &BitVector, _state: &BitVector| input.clone())
    ///     .unwrap();
    ///
    /// network.connect(b, 0, a, 0, 4).unwrap();
    /// ```
    pub fn connect(
        &mut self,
        target: AutomatonId,
        input_start: usize,
        source: AutomatonId,
        output_start: usize,
        count: usize,
    ) -> Result<(), NetworkError> {
        if count == 0 {
            return Err(NetworkError::EmptyRange);
        }
        let input_width = self.expect(target)?.input_width();
        let output_width = self.expect(source)?.output_width();
        check_range(Port::Input, input_start, count, input_width)?;
        check_range(Port::Output, output_start, count, output_width)?;

        self.disconnect(target, input_start, count)?;

        for offset in 0..count {
            let input_bit = input_start + offset;
            let output_bit = output_start + offset;

            // Back-edge first: if its allocation fails, the bit stays
            // unconnected on both sides.
            if let Some(producer) = self.slot_mut(source) {
                producer.dependents[output_bit].attach(target, input_bit)?;
            }
            if let Some(consumer) = self.slot_mut(target) {
                consumer.taps[input_bit] = Some(Tap {
                    source,
                    bit: output_bit,
                });
            }
        }
        Ok(())
    }

    /// Disconnect `count` input bits of `target` starting at `input_start`.
    ///
    /// Bits that are not connected are skipped silently. The corresponding
    /// back-edges are removed from each source's dependent list.
    pub fn disconnect(
        &mut self,
        target: AutomatonId,
        input_start: usize,
        count: usize,
    ) -> Result<(), NetworkError> {
        if count == 0 {
            return Err(NetworkError::EmptyRange);
        }
        let input_width = self.expect(target)?.input_width();
        check_range(Port::Input, input_start, count, input_width)?;

        for input_bit in input_start..input_start + count {
            let tap = match self.slot_mut(target) {
                Some(consumer) => consumer.taps[input_bit].take(),
                None => None,
            };
            if let Some(tap) = tap {
                if let Some(producer) = self.slot_mut(tap.source) {
                    producer.dependents[tap.bit].detach(target, input_bit);
                }
            }
        }
        Ok(())
    }

    /// Override the unconnected input bits of a machine.
    ///
    /// Connected bits are left untouched; they are rewritten from their
    /// source's output at the start of every step regardless of what is
    /// supplied here. `bits` must be exactly as wide as the machine's input.
    pub fn set_input(&mut self, handle: AutomatonId, bits: &BitVector) -> Result<(), NetworkError> {
        let automaton = self.expect_mut(handle)?;
        if automaton.input_width() == 0 {
            return Err(NetworkError::NoInputs);
        }
        if bits.len() != automaton.input_width() {
            return Err(NetworkError::WidthMismatch {
                expected: automaton.input_width(),
                got: bits.len(),
            });
        }

        for index in 0..automaton.input_width() {
            if automaton.taps[index].is_none() {
                automaton.input.set(index, bits.get(index).unwrap_or(false));
            }
        }
        Ok(())
    }

    /// Replace a machine's state out-of-band and recompute its output.
    ///
    /// This is an override, not a transition: the transition function is not
    /// invoked and no round elapses. `bits` must be exactly as wide as the
    /// machine's state.
    pub fn set_state(&mut self, handle: AutomatonId, bits: &BitVector) -> Result<(), NetworkError> {
        let automaton = self.expect_mut(handle)?;
        if bits.len() != automaton.state_width() {
            return Err(NetworkError::WidthMismatch {
                expected: automaton.state_width(),
                got: bits.len(),
            });
        }

        automaton.state.copy_words_from(bits);
        automaton.refresh_output();
        Ok(())
    }

    /// The machine's currently published output.
    ///
    /// This is the only cross-machine observable: peers read outputs, never
    /// internal state.
    pub fn output(&self, handle: AutomatonId) -> Result<&BitVector, NetworkError> {
        Ok(&self.expect(handle)?.output)
    }

    /// Advance every machine in `batch` by one synchronous round.
    ///
    /// Three strictly ordered phases run over the whole batch:
    ///
    /// 1. **Input**: every connected input bit is copied from its source's
    ///    current (pre-round) output; unconnected bits keep their
    ///    [`set_input`](Self::set_input) override.
    /// 2. **Transition**: every machine's next state is computed from its
    ///    freshly configured input and current state, then committed.
    /// 3. **Output**: every machine's output is recomputed from its new
    ///    state.
    ///
    /// Machines not in the batch are frozen; peers keep reading their last
    /// published output. A handle appearing twice in the batch is advanced
    /// twice. All handles are validated before any machine is touched.
    pub fn step(&mut self, batch: &[AutomatonId]) -> Result<(), NetworkError> {
        if batch.is_empty() {
            return Err(NetworkError::EmptyBatch);
        }
        for &handle in batch {
            self.expect(handle)?;
        }

        for &handle in batch {
            self.configure_input(handle);
        }

        // Committing each state inside the phase is sound: transitions read
        // only their own machine's input and state, and cross-machine reads
        // go through outputs, which do not change until the output phase.
        for &handle in batch {
            let next = match self.slot(handle) {
                Some(automaton) => automaton.logic.transition(&automaton.input, &automaton.state),
                None => continue,
            };
            if let Some(automaton) = self.slot_mut(handle) {
                debug_assert_eq!(
                    next.len(),
                    automaton.state_width(),
                    "transition function returned a vector of the wrong width"
                );
                automaton.state.copy_words_from(&next);
            }
        }

        for &handle in batch {
            if let Some(automaton) = self.slot_mut(handle) {
                automaton.refresh_output();
            }
        }

        self.rounds += 1;
        Ok(())
    }

    /// Remove a machine, severing every connection it takes part in.
    ///
    /// Dependents see their formerly connected input bits as unconnected
    /// afterward (the bits keep their last delivered value until overridden
    /// or rewired). A stale handle is a silent no-op. The handle itself is
    /// invalidated before any peer is updated, so self-loops unwind
    /// naturally.
    pub fn remove(&mut self, handle: AutomatonId) {
        let victim = {
            let Some(slot) = self.slots.get_mut(handle.index as usize) else {
                return;
            };
            if slot.generation != handle.generation {
                return;
            }
            let Some(victim) = slot.automaton.take() else {
                return;
            };
            slot.generation = slot.generation.wrapping_add(1);
            victim
        };

        // Outbound edges: every consumer of our output loses its tap.
        for dependents in &victim.dependents {
            for edge in dependents.iter() {
                if let Some(consumer) = self.slot_mut(edge.handle) {
                    consumer.taps[edge.bit] = None;
                }
            }
        }

        // Inbound taps: drop the back-edges this machine holds in its
        // sources.
        for (input_bit, tap) in victim.taps.iter().enumerate() {
            if let Some(tap) = tap {
                if let Some(producer) = self.slot_mut(tap.source) {
                    producer.dependents[tap.bit].detach(handle, input_bit);
                }
            }
        }

        self.free.push(handle.index);
        self.live -= 1;
    }

    /// Whether `handle` refers to a live machine.
    pub fn contains(&self, handle: AutomatonId) -> bool {
        self.slot(handle).is_some()
    }

    /// Number of live machines.
    pub fn len(&self) -> usize {
        self.live
    }

    /// `true` if the network holds no machines.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of completed [`step`](Self::step) rounds.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    // Copy every connected input bit from its source's published output.
    // The input buffer is detached while peers are read so a machine wired
    // to itself can read its own output.
    fn configure_input(&mut self, handle: AutomatonId) {
        let mut staged = match self.slot_mut(handle) {
            Some(automaton) => mem::take(&mut automaton.input),
            None => return,
        };

        if let Some(automaton) = self.slot(handle) {
            for (index, tap) in automaton.taps.iter().enumerate() {
                if let Some(tap) = tap {
                    let bit = self
                        .slot(tap.source)
                        .and_then(|peer| peer.output.get(tap.bit))
                        .unwrap_or(false);
                    staged.set(index, bit);
                }
            }
        }

        if let Some(automaton) = self.slot_mut(handle) {
            automaton.input = staged;
        }
    }

    fn insert(&mut self, automaton: Automaton) -> Result<AutomatonId, NetworkError> {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.automaton = Some(automaton);
                AutomatonId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.try_reserve(1)?;
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    automaton: Some(automaton),
                });
                AutomatonId {
                    index,
                    generation: 0,
                }
            }
        };
        self.live += 1;
        Ok(handle)
    }

    fn slot(&self, handle: AutomatonId) -> Option<&Automaton> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.automaton.as_ref())
    }

    fn slot_mut(&mut self, handle: AutomatonId) -> Option<&mut Automaton> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.automaton.as_mut())
    }

    fn expect(&self, handle: AutomatonId) -> Result<&Automaton, NetworkError> {
        self.slot(handle)
            .ok_or(NetworkError::StaleHandle { handle })
    }

    fn expect_mut(&mut self, handle: AutomatonId) -> Result<&mut Automaton, NetworkError> {
        self.slot_mut(handle)
            .ok_or(NetworkError::StaleHandle { handle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;

    fn identity_machine(network: &mut Network, inputs: usize, states: usize) -> AutomatonId {
        network
            .create_simple(inputs, states, |input: &BitVector, _state: &BitVector| {
                input.clone()
            })
            .unwrap()
    }

    fn holding_machine(network: &mut Network, inputs: usize, states: usize) -> AutomatonId {
        network
            .create_simple(inputs, states, |_input: &BitVector, state: &BitVector| {
                state.clone()
            })
            .unwrap()
    }

    // Walk the whole arena and check the bidirectional wiring invariant in
    // both directions.
    fn assert_wiring_consistent(network: &Network) {
        for (index, slot) in network.slots.iter().enumerate() {
            let Some(automaton) = slot.automaton.as_ref() else {
                continue;
            };
            let handle = AutomatonId::from_raw_parts(index as u32, slot.generation);

            for (input_bit, tap) in automaton.taps.iter().enumerate() {
                if let Some(tap) = tap {
                    let producer = network.slot(tap.source).expect("tap points at a dead machine");
                    assert!(
                        producer.dependents[tap.bit].contains(handle, input_bit),
                        "tap without matching back-edge"
                    );
                }
            }

            for (output_bit, dependents) in automaton.dependents.iter().enumerate() {
                for edge in dependents.iter() {
                    let consumer = network
                        .slot(edge.handle)
                        .expect("back-edge points at a dead machine");
                    assert_eq!(
                        consumer.taps[edge.bit],
                        Some(Tap {
                            source: handle,
                            bit: output_bit
                        }),
                        "back-edge without matching tap"
                    );
                }
            }
        }
    }

    #[test]
    fn create_full_rejects_zero_outputs_and_states() {
        let mut network = Network::new();

        let err = network
            .create_full(
                0,
                0,
                1,
                FnLogic::mirrored(|_input, state| state.clone()),
                &bits![0],
            )
            .unwrap_err();
        assert!(matches!(err, NetworkError::NoOutputs));

        let err = network
            .create_full(
                0,
                1,
                0,
                FnLogic::mirrored(|_input, state| state.clone()),
                &bits![],
            )
            .unwrap_err();
        assert!(matches!(err, NetworkError::NoStates));

        assert!(network.is_empty());
    }

    #[test]
    fn create_full_rejects_wrong_initial_state_width() {
        let mut network = Network::new();
        let err = network
            .create_full(
                0,
                2,
                2,
                FnLogic::mirrored(|_input, state| state.clone()),
                &bits![1, 0, 1],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::WidthMismatch { expected: 2, got: 3 }
        ));
        assert!(network.is_empty());
    }

    #[test]
    fn output_is_observable_before_the_first_step() {
        let mut network = Network::new();
        let machine = network
            .create_full(
                0,
                3,
                3,
                FnLogic::mirrored(|_input, state| state.clone()),
                &bits![1, 0, 1],
            )
            .unwrap();

        assert_eq!(*network.output(machine).unwrap(), bits![1, 0, 1]);
        assert_eq!(network.rounds(), 0);
    }

    #[test]
    fn create_simple_starts_all_zero() {
        let mut network = Network::new();
        let machine = holding_machine(&mut network, 2, 4);
        assert_eq!(*network.output(machine).unwrap(), bits![0; 4]);
    }

    #[test]
    fn connect_validates_before_rewiring() {
        let mut network = Network::new();
        let a = holding_machine(&mut network, 0, 2);
        let b = identity_machine(&mut network, 2, 2);

        assert!(matches!(
            network.connect(b, 0, a, 0, 0),
            Err(NetworkError::EmptyRange)
        ));
        assert!(matches!(
            network.connect(b, 1, a, 0, 2),
            Err(NetworkError::RangeOutOfBounds {
                port: Port::Input,
                ..
            })
        ));
        assert!(matches!(
            network.connect(b, 0, a, 1, 2),
            Err(NetworkError::RangeOutOfBounds {
                port: Port::Output,
                ..
            })
        ));
        assert!(matches!(
            network.connect(b, usize::MAX, a, 0, 2),
            Err(NetworkError::RangeOutOfBounds { .. })
        ));

        assert_wiring_consistent(&network);
    }

    #[test]
    fn connect_links_both_sides() {
        let mut network = Network::new();
        let a = holding_machine(&mut network, 0, 2);
        let b = identity_machine(&mut network, 3, 3);

        network.connect(b, 1, a, 0, 2).unwrap();

        let consumer = network.slot(b).unwrap();
        assert_eq!(consumer.taps[0], None);
        assert_eq!(consumer.taps[1], Some(Tap { source: a, bit: 0 }));
        assert_eq!(consumer.taps[2], Some(Tap { source: a, bit: 1 }));

        let producer = network.slot(a).unwrap();
        assert!(producer.dependents[0].contains(b, 1));
        assert!(producer.dependents[1].contains(b, 2));

        assert_wiring_consistent(&network);
    }

    #[test]
    fn connect_then_disconnect_round_trips() {
        let mut network = Network::new();
        let a = holding_machine(&mut network, 0, 2);
        let b = identity_machine(&mut network, 2, 2);

        network.connect(b, 0, a, 0, 2).unwrap();
        network.disconnect(b, 0, 2).unwrap();

        let consumer = network.slot(b).unwrap();
        assert!(consumer.taps.iter().all(Option::is_none));
        let producer = network.slot(a).unwrap();
        assert!(producer.dependents.iter().all(|deps| deps.is_empty()));

        assert_wiring_consistent(&network);
    }

    #[test]
    fn reconnect_moves_exactly_one_edge_per_bit() {
        let mut network = Network::new();
        let old_source = holding_machine(&mut network, 0, 1);
        let new_source = holding_machine(&mut network, 0, 1);
        let consumer = identity_machine(&mut network, 1, 1);

        network.connect(consumer, 0, old_source, 0, 1).unwrap();
        network.connect(consumer, 0, new_source, 0, 1).unwrap();

        assert!(network.slot(old_source).unwrap().dependents[0].is_empty());
        assert_eq!(network.slot(new_source).unwrap().dependents[0].len(), 1);
        assert_eq!(
            network.slot(consumer).unwrap().taps[0],
            Some(Tap {
                source: new_source,
                bit: 0
            })
        );

        assert_wiring_consistent(&network);
    }

    #[test]
    fn reconnecting_the_same_wiring_does_not_duplicate_edges() {
        let mut network = Network::new();
        let source = holding_machine(&mut network, 0, 2);
        let consumer = identity_machine(&mut network, 2, 2);

        network.connect(consumer, 0, source, 0, 2).unwrap();
        network.connect(consumer, 0, source, 0, 2).unwrap();

        let producer = network.slot(source).unwrap();
        assert_eq!(producer.dependents[0].len(), 1);
        assert_eq!(producer.dependents[1].len(), 1);

        assert_wiring_consistent(&network);
    }

    #[test]
    fn disconnect_of_unconnected_bits_is_silent() {
        let mut network = Network::new();
        let machine = identity_machine(&mut network, 3, 3);

        network.disconnect(machine, 0, 3).unwrap();
        assert_wiring_consistent(&network);
    }

    #[test]
    fn self_loop_wiring_is_supported() {
        let mut network = Network::new();
        let machine = network
            .create_simple(1, 1, |input: &BitVector, _state: &BitVector| input.clone())
            .unwrap();

        network.connect(machine, 0, machine, 0, 1).unwrap();

        let automaton = network.slot(machine).unwrap();
        assert_eq!(
            automaton.taps[0],
            Some(Tap {
                source: machine,
                bit: 0
            })
        );
        assert!(automaton.dependents[0].contains(machine, 0));

        assert_wiring_consistent(&network);
    }

    #[test]
    fn remove_unlinks_every_side() {
        let mut network = Network::new();
        let source = holding_machine(&mut network, 0, 1);
        let middle = identity_machine(&mut network, 1, 1);
        let sink = identity_machine(&mut network, 1, 1);

        network.connect(middle, 0, source, 0, 1).unwrap();
        network.connect(sink, 0, middle, 0, 1).unwrap();

        network.remove(middle);

        assert!(!network.contains(middle));
        assert_eq!(network.len(), 2);
        assert!(network.slot(source).unwrap().dependents[0].is_empty());
        assert_eq!(network.slot(sink).unwrap().taps[0], None);

        assert_wiring_consistent(&network);
    }

    #[test]
    fn remove_of_self_looped_machine_unwinds() {
        let mut network = Network::new();
        let machine = identity_machine(&mut network, 1, 1);
        network.connect(machine, 0, machine, 0, 1).unwrap();

        network.remove(machine);

        assert!(network.is_empty());
        assert_wiring_consistent(&network);
    }

    #[test]
    fn removed_handles_stay_stale_after_slot_reuse() {
        let mut network = Network::new();
        let first = holding_machine(&mut network, 0, 1);
        network.remove(first);

        let second = holding_machine(&mut network, 0, 1);

        // Same slot, new generation: the old handle must not resolve.
        assert!(!network.contains(first));
        assert!(network.contains(second));
        assert!(matches!(
            network.output(first),
            Err(NetworkError::StaleHandle { .. })
        ));
        assert!(matches!(
            network.set_state(first, &bits![1]),
            Err(NetworkError::StaleHandle { .. })
        ));
    }

    #[test]
    fn remove_of_a_stale_handle_is_a_no_op() {
        let mut network = Network::new();
        let machine = holding_machine(&mut network, 0, 1);
        network.remove(machine);
        network.remove(machine);
        assert!(network.is_empty());
    }

    #[test]
    fn set_input_rejects_machines_without_inputs() {
        let mut network = Network::new();
        let machine = holding_machine(&mut network, 0, 1);
        assert!(matches!(
            network.set_input(machine, &bits![]),
            Err(NetworkError::NoInputs)
        ));
    }

    #[test]
    fn set_input_rejects_wrong_width() {
        let mut network = Network::new();
        let machine = identity_machine(&mut network, 2, 2);
        assert!(matches!(
            network.set_input(machine, &bits![1]),
            Err(NetworkError::WidthMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn set_state_rejects_wrong_width() {
        let mut network = Network::new();
        let machine = holding_machine(&mut network, 0, 2);
        assert!(matches!(
            network.set_state(machine, &bits![1, 0, 1]),
            Err(NetworkError::WidthMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn step_rejects_an_empty_batch() {
        let mut network = Network::new();
        assert!(matches!(
            network.step(&[]),
            Err(NetworkError::EmptyBatch)
        ));
    }

    #[test]
    fn step_validates_every_handle_before_mutating() {
        let mut network = Network::new();
        let live = network
            .create_simple(0, 1, |_input: &BitVector, state: &BitVector| {
                let mut next = BitVector::zeroed(1);
                next.set(0, state.get(0) == Some(false));
                next
            })
            .unwrap();
        let dead = holding_machine(&mut network, 0, 1);
        network.remove(dead);

        let err = network.step(&[live, dead]).unwrap_err();
        assert!(matches!(err, NetworkError::StaleHandle { .. }));

        // The live machine was not advanced.
        assert_eq!(*network.output(live).unwrap(), bits![0]);
        assert_eq!(network.rounds(), 0);
    }

    #[test]
    fn step_counts_completed_rounds() {
        let mut network = Network::new();
        let machine = holding_machine(&mut network, 0, 1);

        network.step(&[machine]).unwrap();
        network.step(&[machine]).unwrap();

        assert_eq!(network.rounds(), 2);
    }

    #[test]
    fn stale_handles_are_rejected_everywhere() {
        let mut network = Network::new();
        let live = identity_machine(&mut network, 1, 1);
        let dead = holding_machine(&mut network, 0, 1);
        network.remove(dead);

        assert!(matches!(
            network.connect(live, 0, dead, 0, 1),
            Err(NetworkError::StaleHandle { .. })
        ));
        assert!(matches!(
            network.connect(dead, 0, live, 0, 1),
            Err(NetworkError::StaleHandle { .. })
        ));
        assert!(matches!(
            network.disconnect(dead, 0, 1),
            Err(NetworkError::StaleHandle { .. })
        ));
        assert!(matches!(
            network.set_input(dead, &bits![0]),
            Err(NetworkError::StaleHandle { .. })
        ));
    }
}

//! The automaton entity: buffers, behavior, and connection tables.

use crate::bits::BitVector;
use crate::logic::Logic;
use crate::network::edges::Dependents;
use crate::network::AutomatonId;
use std::collections::TryReserveError;

/// Where a connected input bit taps a peer: the peer's handle and the index
/// of the output bit being read.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Tap {
    pub source: AutomatonId,
    pub bit: usize,
}

/// One Moore machine inside a [`Network`](crate::Network).
///
/// Owns its three bit-vectors and both halves of its wiring: `taps` maps
/// each input bit to the peer output it reads (if any), and `dependents`
/// lists, per output bit, the peers reading it back.
pub(crate) struct Automaton {
    pub logic: Box<dyn Logic>,
    pub state: BitVector,
    pub input: BitVector,
    pub output: BitVector,
    pub taps: Vec<Option<Tap>>,
    pub dependents: Vec<Dependents>,
}

impl Automaton {
    /// Allocate a machine with all-zero buffers, no wiring, and the given
    /// behavior. Any allocation failure leaves nothing behind; the caller
    /// still owns nothing until the value is returned whole.
    pub fn new(
        inputs: usize,
        outputs: usize,
        states: usize,
        logic: Box<dyn Logic>,
    ) -> Result<Self, TryReserveError> {
        let input = BitVector::try_zeroed(inputs)?;
        let output = BitVector::try_zeroed(outputs)?;
        let state = BitVector::try_zeroed(states)?;

        let mut taps = Vec::new();
        taps.try_reserve_exact(inputs)?;
        taps.resize_with(inputs, || None);

        let mut dependents = Vec::new();
        dependents.try_reserve_exact(outputs)?;
        dependents.resize_with(outputs, Dependents::default);

        Ok(Self {
            logic,
            state,
            input,
            output,
            taps,
            dependents,
        })
    }

    pub fn input_width(&self) -> usize {
        self.input.len()
    }

    pub fn output_width(&self) -> usize {
        self.output.len()
    }

    pub fn state_width(&self) -> usize {
        self.state.len()
    }

    /// Recompute the published output from the current state.
    pub fn refresh_output(&mut self) {
        let computed = self.logic.compute_output(&self.state);
        debug_assert_eq!(
            computed.len(),
            self.output.len(),
            "output function returned a vector of the wrong width"
        );
        self.output.copy_words_from(&computed);
    }
}

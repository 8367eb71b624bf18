//! Errors reported by network operations.

use crate::network::AutomatonId;
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Which side of a connection a bit range addresses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Port {
    /// Input bits of the consuming automaton.
    Input,
    /// Output bits of the producing automaton.
    Output,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Port::Input => "input",
            Port::Output => "output",
        })
    }
}

/// Errors that can occur when creating, wiring, or stepping automata.
///
/// Every variant is either an argument problem or an allocation failure;
/// [`kind`](NetworkError::kind) reports which.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("automaton {handle:?} is not present in the network")]
    StaleHandle { handle: AutomatonId },

    #[error("an automaton needs at least one output bit")]
    NoOutputs,

    #[error("an automaton needs at least one state bit")]
    NoStates,

    #[error("supplied vector is {got} bits wide, expected {expected}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("bit range {start}..+{count} is out of bounds for {port} width {width}")]
    RangeOutOfBounds {
        port: Port,
        start: usize,
        count: usize,
        width: usize,
    },

    #[error("a bit range must span at least one bit")]
    EmptyRange,

    #[error("cannot set inputs on an automaton with no input bits")]
    NoInputs,

    #[error("step batch is empty")]
    EmptyBatch,

    #[error("memory allocation failed")]
    OutOfMemory(#[from] TryReserveError),
}

/// The two classes of failure, for callers that match on the class rather
/// than the specific variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// A handle, count, range, or vector width was unusable.
    InvalidArgument,
    /// An allocation failed; nothing was corrupted.
    OutOfMemory,
}

// Overflow-safe bounds check for a bit slice against a declared width.
pub(crate) fn check_range(
    port: Port,
    start: usize,
    count: usize,
    width: usize,
) -> Result<(), NetworkError> {
    match start.checked_add(count) {
        Some(end) if end <= width => Ok(()),
        _ => Err(NetworkError::RangeOutOfBounds {
            port,
            start,
            count,
            width,
        }),
    }
}

impl NetworkError {
    /// Classify this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::{ErrorKind, Network};
    ///
    /// let mut network = Network::new();
    /// let err = network
    ///     .create_simple(0, 0, |_input, state| state.clone())
    ///     .unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::OutOfMemory(_) => ErrorKind::OutOfMemory,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

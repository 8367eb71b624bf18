//! User-supplied machine behavior.
//!
//! A Moore machine's behavior is two pure functions: a transition function
//! from `(input, state)` to the next state, and an output function from
//! `state` alone (output never depends on input directly). Both are opaque
//! to the engine and are modeled as the [`Logic`] capability trait,
//! implemented once per machine kind.

use crate::bits::BitVector;

/// Behavior of one kind of Moore machine.
///
/// Both methods must be pure: deterministic, no side effects, reading only
/// the vectors they are given. The engine owns the machine's buffers and
/// copies each returned vector into them whole-word, so implementations
/// return fresh vectors of the declared widths.
///
/// # Example
///
/// ```rust
/// use lockstep::{BitVector, Logic};
///
/// /// Counts up by one each round, ignoring inputs.
/// struct Counter;
///
/// impl Logic for Counter {
///     fn transition(&self, _input: &BitVector, state: &BitVector) -> BitVector {
///         let mut next = BitVector::zeroed(state.len());
///         let mut carry = true;
///         for (i, bit) in state.iter().enumerate() {
///             next.set(i, bit != carry);
///             carry = carry && bit;
///         }
///         next
///     }
///
///     fn compute_output(&self, state: &BitVector) -> BitVector {
///         state.clone()
///     }
/// }
/// ```
pub trait Logic: Send + Sync {
    /// Compute the next state from the current input and state.
    fn transition(&self, input: &BitVector, state: &BitVector) -> BitVector;

    /// Compute the published output from the current state.
    fn compute_output(&self, state: &BitVector) -> BitVector;
}

/// Type alias for boxed transition closures.
pub type TransitionFn = Box<dyn Fn(&BitVector, &BitVector) -> BitVector + Send + Sync>;

/// Type alias for boxed output closures.
pub type OutputFn = Box<dyn Fn(&BitVector) -> BitVector + Send + Sync>;

/// [`Logic`] built from a pair of closures.
///
/// The closure form keeps one-off machines lightweight; reusable machine
/// kinds implement [`Logic`] directly.
///
/// # Example
///
/// ```rust
/// use lockstep::{BitVector, FnLogic, Logic};
///
/// let flip = FnLogic::new(
///     |_input, state| BitVector::from_bits(&state.iter().map(|b| !b).collect::<Vec<_>>()),
///     |state| state.clone(),
/// );
///
/// let state = BitVector::from_bits(&[true, false]);
/// let next = flip.transition(&BitVector::zeroed(0), &state);
/// assert_eq!(next, BitVector::from_bits(&[false, true]));
/// ```
pub struct FnLogic {
    transition: TransitionFn,
    output: OutputFn,
}

impl FnLogic {
    /// Wrap a transition closure and an output closure.
    pub fn new<T, Y>(transition: T, output: Y) -> Self
    where
        T: Fn(&BitVector, &BitVector) -> BitVector + Send + Sync + 'static,
        Y: Fn(&BitVector) -> BitVector + Send + Sync + 'static,
    {
        Self {
            transition: Box::new(transition),
            output: Box::new(output),
        }
    }

    /// Wrap a transition closure with the identity output function: the
    /// output mirrors the state bit-for-bit.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::{BitVector, FnLogic, Logic};
    ///
    /// let logic = FnLogic::mirrored(|_input, state| state.clone());
    /// let state = BitVector::from_bits(&[true, false, true]);
    /// assert_eq!(logic.compute_output(&state), state);
    /// ```
    pub fn mirrored<T>(transition: T) -> Self
    where
        T: Fn(&BitVector, &BitVector) -> BitVector + Send + Sync + 'static,
    {
        Self::new(transition, BitVector::clone)
    }
}

impl Logic for FnLogic {
    fn transition(&self, input: &BitVector, state: &BitVector) -> BitVector {
        (self.transition)(input, state)
    }

    fn compute_output(&self, state: &BitVector) -> BitVector {
        (self.output)(state)
    }
}

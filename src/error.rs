//! Error types for cycle composition and style assignment

use thiserror::Error;

/// Errors raised by the cycle algebra and the remembered-style cache.
///
/// Every failure is reported immediately; no operation leaves a partially
/// modified cycle behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Two composed cycles share at least one key
    #[error("cannot compose overlapping cycles: {keys} present on both sides")]
    Overlap {
        /// The shared keys, rendered for display
        keys: String,
    },

    /// Pairwise combination of cycles with different lengths
    #[error("can only add equal length cycles, not {left} and {right}")]
    LengthMismatch {
        /// Length of the left operand
        left: usize,
        /// Length of the right operand
        right: usize,
    },

    /// An operand of the wrong kind was supplied to a composition operator
    #[error("unsupported operand for {op}: {detail}")]
    TypeMismatch {
        /// The operator that was applied
        op: &'static str,
        /// What was supplied instead
        detail: String,
    },

    /// A cycle was indexed with something other than a slice
    #[error("can only index a cycle with a slice")]
    IndexNotSlice,

    /// A slice with a zero step
    #[error("slice step cannot be zero")]
    ZeroStep,

    /// The cycle builder was called with an invalid combination of arguments
    #[error("invalid cycler arguments: {0}")]
    Usage(&'static str),

    /// A keyed cycle was requested from a source with several keys
    #[error("cannot build a cycle from a multi-property cycle ({count} keys)")]
    MultiKeySource {
        /// Number of keys on the source cycle
        count: usize,
    },

    /// `change_key` target is already a key
    #[error("can't replace {old} with {new}, {new} is already a key")]
    KeyCollision {
        /// The key being renamed
        old: String,
        /// The requested new name
        new: String,
    },

    /// `change_key` source is not a key
    #[error("can't replace {old} with {new}, {old} is not a key")]
    KeyNotFound {
        /// The key being renamed
        old: String,
        /// The requested new name
        new: String,
    },

    /// `concat` on cycles whose key sets differ
    #[error("keys do not match: {left} vs {right}")]
    KeySetMismatch {
        /// Keys of the left cycle
        left: String,
        /// Keys of the right cycle
        right: String,
    },

    /// A product or repetition would hold more styles than `usize` can count
    #[error("cycle too long: {left} x {right} styles overflows")]
    LengthOverflow {
        /// Length of the left operand (or the repeated cycle)
        left: usize,
        /// Length of the right operand (or the repeat count)
        right: usize,
    },

    /// The remembered-style cache ran out of styles
    #[error("asked for more styles than we have ({available} available)")]
    StylesExhausted {
        /// Length of the underlying cycle
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = CycleError::LengthMismatch { left: 3, right: 15 };
        assert_eq!(
            err.to_string(),
            "can only add equal length cycles, not 3 and 15"
        );
    }

    #[test]
    fn test_key_collision_message_names_both_keys() {
        let err = CycleError::KeyCollision {
            old: "\"color\"".to_string(),
            new: "\"lw\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"color\""));
        assert!(msg.contains("\"lw\" is already a key"));
    }
}

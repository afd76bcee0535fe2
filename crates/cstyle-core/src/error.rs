//! Structural invariant violations raised by the engine.
//!
//! Heuristic misses never produce these; they mean a caller broke a contract
//! (unbalanced checkpoints, matching a non-delimiter, popping an empty stack)
//! and abort the run.

use thiserror::Error;

use crate::token::TokenKind;

/// A broken engine contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// A cursor still held checkpoints when its caller returned.
    #[error("cursor returned with {depth} unrestored checkpoint(s)")]
    UnbalancedCheckpoint {
        /// Number of checkpoints left on the stack.
        depth: usize,
    },

    /// `restore()` was called with an empty checkpoint stack.
    #[error("restore called without a matching checkpoint")]
    RestoreWithoutCheckpoint,

    /// The delimiter matcher was invoked on a token that is not a delimiter.
    #[error("token {index} ({kind:?}) is not a brace, parenthesis, or bracket")]
    NotADelimiter {
        /// Index of the offending token.
        index: usize,
        /// Its kind.
        kind: TokenKind,
    },

    /// A query addressed a position outside the token sequence.
    #[error("token index {index} is out of range (stream has {len} tokens)")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Stream length.
        len: usize,
    },

    /// A declaration context was popped from an empty stack.
    #[error("declaration context stack underflow")]
    ContextUnderflow,
}

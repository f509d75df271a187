//! # Error Taxonomy
//!
//! One enum for the whole crate. The distinctions matter:
//!
//! - [`ChainError::Store`] — the store itself failed. Infrastructure
//!   problem, nothing wrong with the chain content.
//! - [`ChainError::Corrupt`] — the store answered, but what came back
//!   is not a chain. Somebody (or some disk) broke an invariant.
//! - [`ChainError::Conflict`] — two writers raced for the same height.
//!   The loser gets this; retrying with a fresh tip is the caller's
//!   call, never ours.
//!
//! Verification *mismatches* are deliberately absent: a failed digest
//! check is the verifier's normal output (`Verdict::Invalid`), not an
//! error.

use thiserror::Error;

/// Errors that can occur while operating on the ledger.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The underlying store is unreachable or failed internally.
    /// Propagated untouched; retry policy belongs to the caller.
    #[error("store error: {0}")]
    Store(#[from] sled::Error),

    /// The requested height does not exist. Never silently treated as
    /// "empty" — a missing block is an answer, not a zero.
    #[error("no block at height {height}")]
    NotFound { height: u64 },

    /// Block bytes failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(String),

    /// The chain content violates a structural invariant: a stored
    /// block is undecodable, or the height range has a gap.
    #[error("chain corrupt at height {height}: {detail}")]
    Corrupt { height: u64, detail: String },

    /// A concurrent append raced ahead at the same height. The block
    /// already stored wins; this append wrote nothing.
    #[error("height {height} already occupied by a concurrent append")]
    Conflict { height: u64 },

    /// `append` was called before `initialize` — there is no genesis
    /// block to link against.
    #[error("chain is not initialized (no genesis block)")]
    NotInitialized,
}

/// Convenience alias used throughout the crate.
pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    /// Map a codec failure at a known height to chain corruption.
    ///
    /// The engine and verifier use this to distinguish "the store is
    /// broken" from "the chain content is broken": bytes that do not
    /// parse as a block mean the latter.
    pub fn corrupt_at(height: u64, err: ChainError) -> ChainError {
        match err {
            ChainError::Codec(detail) => ChainError::Corrupt { height, detail },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_maps_to_corrupt_at_height() {
        let err = ChainError::corrupt_at(7, ChainError::Codec("truncated".into()));
        match err {
            ChainError::Corrupt { height, detail } => {
                assert_eq!(height, 7);
                assert_eq!(detail, "truncated");
            }
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn non_codec_errors_pass_through() {
        let err = ChainError::corrupt_at(3, ChainError::NotFound { height: 3 });
        assert!(matches!(err, ChainError::NotFound { height: 3 }));
    }

    #[test]
    fn display_messages_name_the_height() {
        let err = ChainError::Conflict { height: 12 };
        assert!(err.to_string().contains("12"));
    }
}

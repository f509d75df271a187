//! # Ledger Configuration & Constants
//!
//! Every magic number in strata lives here. If you're hardcoding a
//! constant somewhere else, move it.

// ---------------------------------------------------------------------------
// Digest Parameters
// ---------------------------------------------------------------------------

/// The hash function used for block digests.
///
/// SHA-256 — not the fastest hash in 2026, but digests here are compared
/// as opaque byte strings and interoperate with everything ever written.
pub const DIGEST_FUNCTION: &str = "SHA-256";

/// Digest output length in bytes. SHA-256 produces 32-byte digests.
pub const DIGEST_LENGTH: usize = 32;

/// The empty digest sentinel.
///
/// Used as the `previous_digest` of the genesis block, and as the value
/// the `digest` field is blanked to while computing a block's own
/// digest. All zeros — the one value SHA-256 will never hand you.
pub const EMPTY_DIGEST: [u8; 32] = [0u8; 32];

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Default genesis block payload.
///
/// Callers that want a different birth certificate can pass their own
/// payload via `Chain::with_genesis_payload`; this is only the
/// documented default.
pub const DEFAULT_GENESIS_PAYLOAD: &[u8] = b"First block in the chain";

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Name of the sled tree that holds the block sequence.
///
/// Keys are big-endian u64 heights; values are the canonical block
/// encoding. Big-endian so sled's lexicographic ordering matches
/// numeric height ordering.
pub const LEDGER_TREE: &str = "blocks";

/// On-disk format version. Bump on any change to the canonical block
/// encoding — old digests will not recompute under a new encoding.
pub const FORMAT_VERSION: u16 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_is_all_zeros() {
        assert_eq!(EMPTY_DIGEST, [0u8; 32]);
        assert_eq!(EMPTY_DIGEST.len(), DIGEST_LENGTH);
    }

    #[test]
    fn default_genesis_payload_is_nonempty() {
        assert!(!DEFAULT_GENESIS_PAYLOAD.is_empty());
    }
}

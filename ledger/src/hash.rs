//! # Hashing Utilities
//!
//! The digest primitives behind block integrity. Strata uses exactly one
//! hash function — SHA-256 — and treats its output as an opaque 32-byte
//! value everywhere. Digests are compared byte-for-byte and rendered as
//! fixed-length hex strings for humans; they are never reinterpreted
//! numerically.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input and return a fixed-size array.
///
/// This is the workhorse of the crate: every block digest is the
/// SHA-256 of the block's canonical encoding. The `[u8; 32]` return
/// type propagates naturally into [`crate::Block`]'s digest fields
/// without heap allocation.
///
/// # Example
///
/// ```
/// use strata_ledger::hash::sha256_array;
///
/// let digest = sha256_array(b"strata");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute SHA-256 and return the digest as a lowercase hex string.
///
/// Display-oriented variant of [`sha256_array`] — 64 hex characters,
/// suitable for logs and CLI output. Comparison code should use the
/// array form.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256_array(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string — the canonical test vector.
        let hash = sha256_array(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.as_slice(), expected.as_slice());
    }

    #[test]
    fn sha256_deterministic() {
        let a = sha256_array(b"strata");
        let b = sha256_array(b"strata");
        assert_eq!(a, b);
    }

    #[test]
    fn sha256_different_inputs_differ() {
        let a = sha256_array(b"strata");
        let b = sha256_array(b"Strata"); // case sensitive!
        assert_ne!(a, b);
    }

    #[test]
    fn hex_matches_array() {
        let data = b"consistency check";
        assert_eq!(sha256_hex(data), hex::encode(sha256_array(data)));
        assert_eq!(sha256_hex(data).len(), 64);
    }
}

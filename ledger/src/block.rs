//! # Block Structure & Canonical Codec
//!
//! A block is the unit of the chain. Each block carries an opaque
//! payload, a link to its predecessor's digest, and a digest over its
//! own canonical encoding.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  Block                                          │
//! │  ├── height: u64            (0 = genesis)       │
//! │  ├── body: Vec<u8>          (opaque payload)    │
//! │  ├── timestamp: u64         (epoch seconds)     │
//! │  ├── previous_digest: [u8; 32]                  │
//! │  └── digest: [u8; 32]       (SHA-256, see below)│
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Digest Computation
//!
//! A block's digest is the SHA-256 of its canonical encoding with the
//! `digest` field itself blanked to [`EMPTY_DIGEST`]. The digest cannot
//! cover itself, so it covers the hole where it will go.
//!
//! ## Canonical Encoding
//!
//! Blocks encode with bincode: fixed field order, little-endian
//! integers, length-prefixed byte strings. Two logically equal blocks
//! encode to identical bytes — this determinism is load-bearing,
//! because digests are computed over the encoding. The same bytes are
//! what the store persists, so what you hash is what you wrote.

use serde::{Deserialize, Serialize};

use crate::config::EMPTY_DIGEST;
use crate::error::{ChainError, ChainResult};
use crate::hash::sha256_array;

/// One immutable record in the chain.
///
/// Blocks are immutable after construction. The engine assigns
/// `height`, `timestamp`, and `previous_digest`; the `body` is
/// caller-supplied and never interpreted by the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Zero-based position in the chain; also the store key.
    pub height: u64,
    /// Opaque caller-supplied payload.
    pub body: Vec<u8>,
    /// Unix timestamp (seconds) at append time. Reflects real insertion
    /// time; monotonicity across heights is not guaranteed.
    pub timestamp: u64,
    /// Digest of the block at `height - 1`. [`EMPTY_DIGEST`] for genesis.
    pub previous_digest: [u8; 32],
    /// SHA-256 over this block's canonical encoding with this field
    /// blanked during computation.
    pub digest: [u8; 32],
}

impl Block {
    /// Construct the genesis block.
    ///
    /// Height 0, `previous_digest` of all zeros, digest stamped over
    /// the finished record. The payload is caller-defined; the engine
    /// defaults to [`crate::config::DEFAULT_GENESIS_PAYLOAD`].
    pub fn genesis(body: Vec<u8>, timestamp: u64) -> ChainResult<Self> {
        let mut block = Block {
            height: 0,
            body,
            timestamp,
            previous_digest: EMPTY_DIGEST,
            digest: EMPTY_DIGEST,
        };
        block.digest = block.compute_digest()?;
        Ok(block)
    }

    /// Construct a new block extending `parent`.
    ///
    /// Assigns `height = parent.height + 1`, links `previous_digest`
    /// to the parent's stored digest, and stamps the new block's own
    /// digest last.
    pub fn next(parent: &Block, body: Vec<u8>, timestamp: u64) -> ChainResult<Self> {
        let mut block = Block {
            height: parent.height + 1,
            body,
            timestamp,
            previous_digest: parent.digest,
            digest: EMPTY_DIGEST,
        };
        block.digest = block.compute_digest()?;
        Ok(block)
    }

    /// Canonically encode this block to bytes.
    ///
    /// Deterministic: equal blocks produce identical bytes. This is the
    /// persisted representation and the digest preimage (with `digest`
    /// blanked for the latter).
    pub fn encode(&self) -> ChainResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ChainError::Codec(e.to_string()))
    }

    /// Decode a block from its canonical encoding.
    ///
    /// Left-inverse of [`Block::encode`]. Fails with
    /// [`ChainError::Codec`] on malformed input; callers that know the
    /// height map that to [`ChainError::Corrupt`].
    pub fn decode(bytes: &[u8]) -> ChainResult<Self> {
        bincode::deserialize(bytes).map_err(|e| ChainError::Codec(e.to_string()))
    }

    /// Recompute this block's digest from its content.
    ///
    /// Encodes a copy with the `digest` field set to [`EMPTY_DIGEST`],
    /// then hashes the encoding. Pure — no side effects, no store
    /// access. Use this to check that the stored `digest` matches the
    /// actual content.
    pub fn compute_digest(&self) -> ChainResult<[u8; 32]> {
        let mut blanked = self.clone();
        blanked.digest = EMPTY_DIGEST;
        Ok(sha256_array(&blanked.encode()?))
    }

    /// True when the stored digest matches the recomputed one.
    pub fn is_self_consistent(&self) -> ChainResult<bool> {
        Ok(self.digest == self.compute_digest()?)
    }

    /// Return the block digest as a hex string.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Return the previous-block digest as a hex string.
    pub fn previous_digest_hex(&self) -> String {
        hex::encode(self.previous_digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis() -> Block {
        Block::genesis(b"test genesis".to_vec(), 1_000_000).unwrap()
    }

    #[test]
    fn genesis_block_properties() {
        let g = genesis();
        assert_eq!(g.height, 0);
        assert_eq!(g.previous_digest, EMPTY_DIGEST);
        assert_ne!(g.digest, EMPTY_DIGEST);
        assert!(g.is_self_consistent().unwrap());
    }

    #[test]
    fn genesis_digest_is_deterministic() {
        let g1 = genesis();
        let g2 = genesis();
        assert_eq!(g1.digest, g2.digest);
    }

    #[test]
    fn next_block_links_to_parent() {
        let g = genesis();
        let b1 = Block::next(&g, b"payload".to_vec(), 1_000_001).unwrap();

        assert_eq!(b1.height, 1);
        assert_eq!(b1.previous_digest, g.digest);
        assert!(b1.is_self_consistent().unwrap());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let g = genesis();
        let b1 = Block::next(&g, vec![0, 1, 2, 255], 1_000_001).unwrap();

        let bytes = b1.encode().unwrap();
        let recovered = Block::decode(&bytes).unwrap();
        assert_eq!(b1, recovered);
    }

    #[test]
    fn encoding_is_deterministic() {
        let g = genesis();
        let a = Block::next(&g, b"same".to_vec(), 42).unwrap();
        let b = Block::next(&g, b"same".to_vec(), 42).unwrap();
        assert_eq!(a.encode().unwrap(), b.encode().unwrap());
    }

    #[test]
    fn decode_rejects_garbage() {
        // Truncated input must fail, never produce a phantom block.
        let err = Block::decode(&[0x01, 0x02]).unwrap_err();
        assert!(matches!(err, ChainError::Codec(_)));
    }

    #[test]
    fn digest_covers_every_field() {
        let g = genesis();
        let base = Block::next(&g, b"body".to_vec(), 100).unwrap();

        // Vary each field in turn; the digest must move every time.
        let mut other = base.clone();
        other.body = b"tampered".to_vec();
        assert_ne!(
            base.compute_digest().unwrap(),
            other.compute_digest().unwrap()
        );

        let mut other = base.clone();
        other.height += 1;
        assert_ne!(
            base.compute_digest().unwrap(),
            other.compute_digest().unwrap()
        );

        let mut other = base.clone();
        other.timestamp += 1;
        assert_ne!(
            base.compute_digest().unwrap(),
            other.compute_digest().unwrap()
        );

        let mut other = base.clone();
        other.previous_digest[0] ^= 0xFF;
        assert_ne!(
            base.compute_digest().unwrap(),
            other.compute_digest().unwrap()
        );
    }

    #[test]
    fn digest_ignores_stored_digest_field() {
        // The digest is computed over the blanked record, so the value
        // currently sitting in the digest field must not influence it.
        let g = genesis();
        let block = Block::next(&g, b"body".to_vec(), 100).unwrap();

        let mut scribbled = block.clone();
        scribbled.digest = [0xAB; 32];
        assert_eq!(
            block.compute_digest().unwrap(),
            scribbled.compute_digest().unwrap()
        );
    }

    #[test]
    fn tampered_body_is_not_self_consistent() {
        let g = genesis();
        let mut block = Block::next(&g, b"honest".to_vec(), 100).unwrap();
        block.body = b"forged".to_vec();
        assert!(!block.is_self_consistent().unwrap());
    }

    #[test]
    fn hex_helpers_render_64_chars() {
        let g = genesis();
        assert_eq!(g.digest_hex().len(), 64);
        assert_eq!(g.previous_digest_hex(), "0".repeat(64));
    }
}

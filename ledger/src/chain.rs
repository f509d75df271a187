//! # Chain Append Engine
//!
//! Owns the append protocol: genesis bootstrap, height assignment,
//! previous-digest linking, digest stamping, and persistence. One block
//! per call, no retries, no gap repair — a gap is corruption to be
//! reported, never backfilled.
//!
//! ## Concurrency
//!
//! Correct height assignment assumes a single logical writer, but the
//! engine still defends against accidental concurrent callers. The
//! read-length / write-at-length sequence is the classic race: two
//! appends read the same length, then both write at it. Two layers
//! prevent that here:
//!
//! 1. The whole read-modify-write runs under a per-chain mutex.
//! 2. The store's insert is atomic insert-if-absent, so even a foreign
//!    writer bypassing the mutex gets a [`ChainError::Conflict`]
//!    instead of a silent overwrite.
//!
//! A caller that observes `Conflict` may retry with a freshly read tip;
//! the engine never retries internally, to avoid masking real
//! concurrency bugs.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::block::Block;
use crate::config::DEFAULT_GENESIS_PAYLOAD;
use crate::error::{ChainError, ChainResult};
use crate::store::LedgerStore;

/// The chain append engine.
///
/// Holds a constructor-injected store handle — the store's lifecycle is
/// tied to this object, not to process-wide state. The store is the
/// single source of truth: every operation re-reads it, nothing is
/// cached across calls.
pub struct Chain<S: LedgerStore> {
    store: S,
    genesis_payload: Vec<u8>,
    /// Serializes the read-length → write-at-length critical section.
    append_lock: Mutex<()>,
}

impl<S: LedgerStore> Chain<S> {
    /// Create an engine over `store` with the default genesis payload.
    pub fn new(store: S) -> Self {
        Self::with_genesis_payload(store, DEFAULT_GENESIS_PAYLOAD.to_vec())
    }

    /// Create an engine with a caller-defined genesis payload.
    ///
    /// Only consulted by [`Chain::initialize`] on an empty store; once
    /// a genesis block exists the payload is whatever was persisted.
    pub fn with_genesis_payload(store: S, genesis_payload: Vec<u8>) -> Self {
        Self {
            store,
            genesis_payload,
            append_lock: Mutex::new(()),
        }
    }

    /// Borrow the underlying store, e.g. to construct a
    /// [`crate::Verifier`] over the same data.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the genesis block if the chain is empty.
    ///
    /// Idempotent: on a non-empty store this is a no-op. A concurrent
    /// initializer that wins the height-0 insert is also treated as
    /// success — the genesis block exists either way.
    pub fn initialize(&self) -> ChainResult<()> {
        let _guard = self.append_lock.lock();

        if self.store.count()? > 0 {
            return Ok(());
        }

        let genesis = Block::genesis(self.genesis_payload.clone(), unix_now())?;
        match self.store.insert(0, &genesis.encode()?) {
            Ok(()) => {
                tracing::info!(digest = %genesis.digest_hex(), "genesis block created");
                Ok(())
            }
            Err(ChainError::Conflict { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Extend the chain by exactly one block carrying `body`.
    ///
    /// Reads the current length, loads the tip, builds the new block
    /// (height, timestamp, link), stamps its digest, and persists it
    /// atomically.
    ///
    /// # Errors
    ///
    /// - [`ChainError::NotInitialized`] before [`Chain::initialize`].
    /// - [`ChainError::Corrupt`] when the tip is absent or undecodable
    ///   — the contiguity invariant was already broken externally.
    /// - [`ChainError::Conflict`] when a concurrent writer raced ahead
    ///   at the same height. Nothing was written.
    pub fn append(&self, body: Vec<u8>) -> ChainResult<Block> {
        let _guard = self.append_lock.lock();

        let next_height = self.store.count()?;
        if next_height == 0 {
            return Err(ChainError::NotInitialized);
        }

        let tip = self
            .load_block(next_height - 1)
            .map_err(|e| match e {
                // A missing tip with a nonzero count means the stored
                // heights are not contiguous.
                ChainError::NotFound { height } => ChainError::Corrupt {
                    height,
                    detail: "tip block missing below current length".to_string(),
                },
                other => other,
            })?;

        let block = Block::next(&tip, body, unix_now())?;
        self.store.insert(block.height, &block.encode()?)?;

        tracing::debug!(
            height = block.height,
            digest = %block.digest_hex(),
            "block appended"
        );
        Ok(block)
    }

    /// Current chain length (number of stored blocks).
    pub fn len(&self) -> ChainResult<u64> {
        self.store.count()
    }

    /// True when no block has been persisted yet.
    pub fn is_empty(&self) -> ChainResult<bool> {
        Ok(self.store.count()? == 0)
    }

    /// Index of the tip block, or `None` when uninitialized.
    ///
    /// Always re-reads the store; the count is never cached.
    pub fn height(&self) -> ChainResult<Option<u64>> {
        let count = self.store.count()?;
        Ok(count.checked_sub(1))
    }

    /// Load and decode the block at `height`.
    ///
    /// # Errors
    ///
    /// [`ChainError::NotFound`] when absent, [`ChainError::Corrupt`]
    /// when the stored bytes do not parse as a block.
    pub fn get_block(&self, height: u64) -> ChainResult<Block> {
        self.load_block(height)
    }

    /// Load and decode the tip block.
    pub fn tip(&self) -> ChainResult<Block> {
        match self.height()? {
            Some(h) => self.load_block(h),
            None => Err(ChainError::NotInitialized),
        }
    }

    fn load_block(&self, height: u64) -> ChainResult<Block> {
        let bytes = self
            .store
            .get(height)?
            .ok_or(ChainError::NotFound { height })?;
        Block::decode(&bytes).map_err(|e| ChainError::corrupt_at(height, e))
    }
}

/// Current Unix timestamp in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

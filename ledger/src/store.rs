//! # Ledger Store
//!
//! Ordered height → bytes persistence behind the [`LedgerStore`] trait,
//! with a sled-backed implementation. The chain engine and the verifier
//! both consume the trait; only tests and recovery tooling ever touch a
//! backend directly.
//!
//! ## Contract
//!
//! Three operations, deliberately minimal:
//!
//! | Operation | Semantics                                         |
//! |-----------|---------------------------------------------------|
//! | `insert`  | atomic insert-if-absent; occupied → `Conflict`    |
//! | `get`     | point lookup; absent → `None`                     |
//! | `count`   | number of stored entries = current chain length   |
//!
//! No range scan is part of the contract — the verifier reads by
//! explicit height. [`SledStore::iter`] exists for inspection tooling
//! only.
//!
//! ## Key Encoding
//!
//! Heights are stored as big-endian u64 so that sled's lexicographic
//! ordering matches numeric ordering.

use sled::{Db, Tree};
use std::path::Path;

use crate::config::LEDGER_TREE;
use crate::error::{ChainError, ChainResult};

/// Persistence contract consumed by the append engine and verifier.
///
/// Implementations must be safe to share across threads: the engine is
/// the only mutator, while verifiers read with arbitrary parallelism.
pub trait LedgerStore: Send + Sync {
    /// Store `bytes` at `height`, failing with [`ChainError::Conflict`]
    /// if the height is already occupied. The check and the write are
    /// atomic — two racing inserts at the same height cannot both
    /// succeed.
    fn insert(&self, height: u64, bytes: &[u8]) -> ChainResult<()>;

    /// Fetch the bytes stored at `height`, or `None` if absent.
    fn get(&self, height: u64) -> ChainResult<Option<Vec<u8>>>;

    /// Number of stored entries. The engine treats this as the current
    /// chain length.
    fn count(&self) -> ChainResult<u64>;
}

/// Sled-backed [`LedgerStore`].
///
/// Wraps a sled `Db` and the [`LEDGER_TREE`] tree. sled is inherently
/// thread-safe — lock-free concurrent reads, serialized writes — so a
/// `SledStore` can be shared via `Arc` without external locking.
#[derive(Debug, Clone)]
pub struct SledStore {
    /// Underlying database handle; kept for flushing.
    db: Db,
    /// Block sequence: big-endian u64 height → canonical block bytes.
    blocks: Tree,
}

impl SledStore {
    /// Open or create a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> ChainResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary in-memory store, cleaned up on drop.
    ///
    /// Ideal for tests — no filesystem side effects.
    pub fn open_temporary() -> ChainResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> ChainResult<Self> {
        let blocks = db.open_tree(LEDGER_TREE)?;
        Ok(Self { db, blocks })
    }

    /// Overwrite the bytes at `height` unconditionally.
    ///
    /// This bypasses the insert-if-absent discipline and exists for
    /// recovery tooling and tamper-detection tests. The append engine
    /// never calls it — in normal operation blocks are written once and
    /// never mutated.
    pub fn overwrite(&self, height: u64, bytes: &[u8]) -> ChainResult<()> {
        self.blocks.insert(height.to_be_bytes(), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Iterate all stored entries in ascending height order.
    ///
    /// Convenience for inspection tooling (`strata show --all`); not
    /// part of the [`LedgerStore`] contract.
    pub fn iter(&self) -> impl Iterator<Item = ChainResult<(u64, Vec<u8>)>> + '_ {
        self.blocks.iter().map(|entry| {
            let (key, value) = entry?;
            let height_bytes: [u8; 8] = key
                .as_ref()
                .try_into()
                .map_err(|_| ChainError::Codec("store key is not a u64 height".to_string()))?;
            Ok((u64::from_be_bytes(height_bytes), value.to_vec()))
        })
    }

    /// Force a flush of all pending writes to disk.
    pub fn flush(&self) -> ChainResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl LedgerStore for SledStore {
    fn insert(&self, height: u64, bytes: &[u8]) -> ChainResult<()> {
        // compare_and_swap with old = None is sled's insert-if-absent:
        // the emptiness check and the write happen atomically.
        let outcome = self
            .blocks
            .compare_and_swap(height.to_be_bytes(), None::<&[u8]>, Some(bytes))?;
        if outcome.is_err() {
            return Err(ChainError::Conflict { height });
        }
        self.db.flush()?;
        Ok(())
    }

    fn get(&self, height: u64) -> ChainResult<Option<Vec<u8>>> {
        Ok(self.blocks.get(height.to_be_bytes())?.map(|v| v.to_vec()))
    }

    fn count(&self) -> ChainResult<u64> {
        Ok(self.blocks.len() as u64)
    }
}

// Blanket impl so shared handles satisfy the trait without ceremony.
impl<S: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<S> {
    fn insert(&self, height: u64, bytes: &[u8]) -> ChainResult<()> {
        (**self).insert(height, bytes)
    }

    fn get(&self, height: u64) -> ChainResult<Option<Vec<u8>>> {
        (**self).get(height)
    }

    fn count(&self) -> ChainResult<u64> {
        (**self).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_temporary_store_is_empty() {
        let store = SledStore::open_temporary().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.get(0).unwrap().is_none());
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let store = SledStore::open_temporary().unwrap();
        store.insert(0, b"genesis bytes").unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(0).unwrap().unwrap(), b"genesis bytes");
    }

    #[test]
    fn insert_rejects_occupied_height() {
        let store = SledStore::open_temporary().unwrap();
        store.insert(5, b"first").unwrap();

        let err = store.insert(5, b"second").unwrap_err();
        assert!(matches!(err, ChainError::Conflict { height: 5 }));

        // The original value must survive the rejected write.
        assert_eq!(store.get(5).unwrap().unwrap(), b"first");
    }

    #[test]
    fn overwrite_bypasses_conflict_check() {
        let store = SledStore::open_temporary().unwrap();
        store.insert(2, b"original").unwrap();
        store.overwrite(2, b"tampered").unwrap();
        assert_eq!(store.get(2).unwrap().unwrap(), b"tampered");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn iter_yields_ascending_heights() {
        let store = SledStore::open_temporary().unwrap();
        // Insert out of order; big-endian keys restore numeric order.
        for h in [3u64, 0, 256, 1] {
            store.insert(h, &h.to_le_bytes()).unwrap();
        }

        let heights: Vec<u64> = store.iter().map(|e| e.unwrap().0).collect();
        assert_eq!(heights, vec![0, 1, 3, 256]);
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            store.insert(0, b"durable").unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(0).unwrap().unwrap(), b"durable");
    }

    #[test]
    fn concurrent_inserts_at_same_height_one_wins() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(SledStore::open_temporary().unwrap());
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert(0, &[i]).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(successes, 1, "exactly one racing insert may win");
        assert_eq!(store.count().unwrap(), 1);
    }
}

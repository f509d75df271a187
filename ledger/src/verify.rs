//! # Integrity Verifier
//!
//! Recomputes and cross-checks digests over one block or the whole
//! chain, producing a precise list of faulty heights. Two invariants
//! are checked:
//!
//! - **Integrity** — a block's stored digest matches the digest
//!   recomputed over its content (tampered payloads surface here).
//! - **Linkage** — each block's `previous_digest` matches the stored
//!   digest of its predecessor. A mismatch is reported at the *later*
//!   height: that block's stated ancestry is the thing that is wrong.
//!
//! Mismatches are verdicts, not errors — detecting tampering is the
//! verifier succeeding. Errors are reserved for a store that won't
//! answer or bytes that won't parse.
//!
//! The verifier never mutates. It takes no lock and tolerates a chain
//! that grows underneath it: a full audit snapshots the length once at
//! the start and inspects only heights below that snapshot.

use crate::block::Block;
use crate::error::{ChainError, ChainResult};
use crate::store::LedgerStore;

/// Outcome of a single verification check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The checked invariant holds.
    Valid,
    /// The invariant is violated; the payload names the faulty height.
    Invalid(u64),
}

impl Verdict {
    /// True for [`Verdict::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Read-only integrity checker over a ledger store.
///
/// Borrow the store from the engine (`chain.store()`) or hand the
/// verifier its own handle — it only ever reads, so any number of
/// verifiers may run in parallel with each other and with a writer.
pub struct Verifier<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> Verifier<'a, S> {
    /// Create a verifier over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Check the integrity invariant for the block at `height`.
    ///
    /// Recomputes the digest over the loaded block with its stored
    /// digest blanked, and compares. `Invalid(height)` on mismatch.
    ///
    /// # Errors
    ///
    /// [`ChainError::NotFound`] when no block exists at `height`;
    /// [`ChainError::Corrupt`] when the stored bytes do not decode.
    pub fn verify_block(&self, height: u64) -> ChainResult<Verdict> {
        let block = load_block(self.store, height)?;
        if block.is_self_consistent()? {
            Ok(Verdict::Valid)
        } else {
            tracing::warn!(height, "block digest mismatch");
            Ok(Verdict::Invalid(height))
        }
    }

    /// Check the link invariant between `height` and `height + 1`.
    ///
    /// Compares the stored digest of the block at `height` against the
    /// `previous_digest` claimed by the block above it. On mismatch the
    /// verdict is `Invalid(height + 1)` — the later block carries the
    /// wrong ancestry. When `height` is the tip there is nothing to
    /// link to and the verdict is trivially `Valid`.
    pub fn verify_link(&self, height: u64) -> ChainResult<Verdict> {
        let block = load_block(self.store, height)?;

        let successor = match self.store.get(height + 1)? {
            Some(bytes) => {
                Block::decode(&bytes).map_err(|e| ChainError::corrupt_at(height + 1, e))?
            }
            None => return Ok(Verdict::Valid),
        };

        if successor.previous_digest == block.digest {
            Ok(Verdict::Valid)
        } else {
            tracing::warn!(height = height + 1, "broken link to predecessor");
            Ok(Verdict::Invalid(height + 1))
        }
    }

    /// Begin a full-chain audit.
    ///
    /// The chain length is snapshotted here; blocks appended while the
    /// audit runs are outside its scope. The returned iterator is lazy
    /// and restartable — drop it between heights to cancel, call
    /// `audit()` again to start over.
    pub fn audit(&self) -> ChainResult<ChainAudit<'a, S>> {
        let len = self.store.count()?;
        Ok(ChainAudit {
            store: self.store,
            len,
            next: 0,
            prev_digest: [0u8; 32],
            done: false,
        })
    }

    /// Run a full audit and collect every faulty height.
    ///
    /// An empty result means the chain is intact end-to-end. Each
    /// faulty height appears once, in ascending order, whether it
    /// failed the integrity check, the link check, or both.
    pub fn verify_chain(&self) -> ChainResult<Vec<u64>> {
        self.audit()?.collect()
    }
}

/// Lazy iterator over faulty heights, ascending.
///
/// Yields `Ok(height)` per damaged block and at most one `Err` (a store
/// or decode failure), after which it fuses. A height failing both the
/// integrity and the link check is reported once.
pub struct ChainAudit<'a, S: LedgerStore> {
    store: &'a S,
    /// Chain length snapshotted when the audit began.
    len: u64,
    next: u64,
    /// Stored digest of the previously inspected block.
    prev_digest: [u8; 32],
    done: bool,
}

impl<S: LedgerStore> ChainAudit<'_, S> {
    /// Number of blocks this audit covers.
    pub fn len_snapshot(&self) -> u64 {
        self.len
    }
}

impl<S: LedgerStore> Iterator for ChainAudit<'_, S> {
    type Item = ChainResult<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && self.next < self.len {
            let height = self.next;

            let block = match load_block(self.store, height) {
                Ok(block) => block,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            let intact = match block.is_self_consistent() {
                Ok(ok) => ok,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            // Link check against the predecessor's stored digest. The
            // later block is the faulty one, so the check lands on the
            // same height as the integrity check and dedup is free.
            let linked = height == 0 || block.previous_digest == self.prev_digest;

            self.prev_digest = block.digest;
            self.next += 1;

            if !intact || !linked {
                return Some(Ok(height));
            }
        }
        None
    }
}

fn load_block<S: LedgerStore>(store: &S, height: u64) -> ChainResult<Block> {
    let bytes = store
        .get(height)?
        .ok_or(ChainError::NotFound { height })?;
    Block::decode(&bytes).map_err(|e| ChainError::corrupt_at(height, e))
}

// Copyright (c) 2026 Strata Contributors. MIT License.
// See LICENSE for details.

//! # Strata — Append-Only Hash-Linked Ledger
//!
//! Strata maintains a single-strand, append-only sequence of immutable
//! blocks backed by a persistent ordered key-value store, and can prove
//! at any time that nobody has quietly rewritten history.
//!
//! There is no consensus, no mempool, no peer-to-peer gossip, and no
//! forking here — deliberately. Strata is the part of a blockchain that
//! is actually a chain: one writer, one strand, and after-the-fact
//! tamper detection over the whole range.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the moving parts:
//!
//! - **hash** — SHA-256 digest primitives. The only crypto we need.
//! - **block** — The block record, its canonical encoding, and digest
//!   computation. Determinism here is load-bearing.
//! - **store** — The [`LedgerStore`] trait and the sled-backed
//!   [`SledStore`]. Heights in, bytes out.
//! - **chain** — The append engine: genesis bootstrap, height
//!   assignment, digest stamping, atomic persistence.
//! - **verify** — The integrity verifier: recomputes every digest and
//!   cross-checks every link, read-only by construction.
//! - **error** — One error taxonomy for the whole crate.
//! - **config** — Constants. All of them. Nowhere else.
//!
//! ## Quick Tour
//!
//! ```
//! use strata_ledger::chain::Chain;
//! use strata_ledger::store::SledStore;
//! use strata_ledger::verify::Verifier;
//!
//! # fn main() -> Result<(), strata_ledger::error::ChainError> {
//! let store = SledStore::open_temporary()?;
//! let chain = Chain::new(store);
//!
//! chain.initialize()?;
//! chain.append(b"first payload".to_vec())?;
//! chain.append(b"second payload".to_vec())?;
//!
//! assert_eq!(chain.height()?, Some(2));
//!
//! // An intact chain audits clean.
//! let verifier = Verifier::new(chain.store());
//! assert!(verifier.verify_chain()?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Rules
//!
//! 1. The store is the single source of truth — no cached heights.
//! 2. Append never overwrites. A raced height is a [`error::ChainError::Conflict`],
//!    not a silent replacement.
//! 3. Verification mismatches are data, not errors. Finding tampering
//!    is the verifier doing its job.
//! 4. Gaps and undecodable blocks are corruption to be reported, never
//!    repaired automatically.

pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod hash;
pub mod store;
pub mod verify;

pub use block::Block;
pub use chain::Chain;
pub use error::{ChainError, ChainResult};
pub use store::{LedgerStore, SledStore};
pub use verify::{ChainAudit, Verdict, Verifier};

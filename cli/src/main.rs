// Copyright (c) 2026 Strata Contributors. MIT License.
// See LICENSE for details.

//! # Strata CLI
//!
//! Entry point for the `strata` binary. Parses CLI arguments,
//! initializes logging, and drives the ledger core: initialization,
//! single-shot appends, full-chain verification, inspection, and a
//! timer-driven demo loop.
//!
//! The core library exposes only single-shot operations; batching and
//! scheduling live here, in the caller.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

use strata_ledger::chain::Chain;
use strata_ledger::store::SledStore;
use strata_ledger::verify::Verifier;
use strata_ledger::Block;

use cli::{AppendArgs, Commands, DataDirArgs, DemoArgs, InitArgs, ShowArgs, StrataCli};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = StrataCli::parse();
    logging::init_logging(
        "strata=info,strata_ledger=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Init(args) => init_ledger(args),
        Commands::Append(args) => append_block(args),
        Commands::Verify(args) => verify_ledger(args),
        Commands::Show(args) => show_ledger(args),
        Commands::Demo(args) => run_demo(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Display form of a block: payload as lossy UTF-8, digests as hex,
/// timestamp both raw and human-readable.
#[derive(Serialize)]
struct BlockView {
    height: u64,
    body: String,
    timestamp: u64,
    time: String,
    previous_digest: String,
    digest: String,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        let time = chrono::DateTime::from_timestamp(block.timestamp as i64, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        BlockView {
            height: block.height,
            body: String::from_utf8_lossy(&block.body).into_owned(),
            timestamp: block.timestamp,
            time,
            previous_digest: block.previous_digest_hex(),
            digest: block.digest_hex(),
        }
    }
}

/// Open (or create) the ledger store under `data_dir/db`.
fn open_chain(args: &DataDirArgs) -> Result<Chain<SledStore>> {
    let db_path = args.data_dir.join("db");
    ensure_dir(&db_path)?;
    let store = SledStore::open(&db_path)
        .with_context(|| format!("failed to open ledger at {}", db_path.display()))?;
    Ok(Chain::new(store))
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// `strata init` — create the data directory and the genesis block.
fn init_ledger(args: InitArgs) -> Result<()> {
    let db_path = args.data.data_dir.join("db");
    ensure_dir(&db_path)?;
    let store = SledStore::open(&db_path)
        .with_context(|| format!("failed to open ledger at {}", db_path.display()))?;

    let chain = match args.genesis_payload {
        Some(payload) => Chain::with_genesis_payload(store, payload.into_bytes()),
        None => Chain::new(store),
    };
    chain.initialize().context("genesis initialization failed")?;

    let genesis = chain.get_block(0)?;
    tracing::info!(digest = %genesis.digest_hex(), "ledger initialized");

    println!("Ledger initialized.");
    println!("  Data directory : {}", args.data.data_dir.display());
    println!("  Chain length   : {}", chain.len()?);
    println!("  Genesis digest : {}", genesis.digest_hex());
    Ok(())
}

/// `strata append` — append one block and print it.
fn append_block(args: AppendArgs) -> Result<()> {
    let chain = open_chain(&args.data)?;
    let block = chain
        .append(args.payload.into_bytes())
        .context("append failed")?;

    println!("{}", serde_json::to_string_pretty(&BlockView::from(&block))?);
    Ok(())
}

/// `strata verify` — audit the full chain; nonzero exit when damaged.
fn verify_ledger(args: DataDirArgs) -> Result<()> {
    let chain = open_chain(&args)?;
    let verifier = Verifier::new(chain.store());
    let faulty = verifier.verify_chain().context("audit failed")?;

    let len = chain.len()?;
    if faulty.is_empty() {
        println!("No errors detected ({len} blocks verified).");
        return Ok(());
    }

    println!("Block errors = {}", faulty.len());
    for height in &faulty {
        println!("  faulty height: {height}");
    }
    bail!("chain verification failed at {} height(s)", faulty.len());
}

/// `strata show` — status line, one block, or every block.
fn show_ledger(args: ShowArgs) -> Result<()> {
    let chain = open_chain(&args.data)?;

    if let Some(height) = args.height {
        let block = chain.get_block(height)?;
        println!("{}", serde_json::to_string_pretty(&BlockView::from(&block))?);
        return Ok(());
    }

    if args.all {
        for entry in chain.store().iter() {
            let (height, bytes) = entry?;
            let block = Block::decode(&bytes)
                .with_context(|| format!("undecodable block at height {height}"))?;
            println!("{}", serde_json::to_string(&BlockView::from(&block))?);
        }
        return Ok(());
    }

    match chain.height()? {
        Some(height) => {
            let tip = chain.tip()?;
            println!("height     : {height}");
            println!("length     : {}", chain.len()?);
            println!("tip digest : {}", tip.digest_hex());
        }
        None => println!("ledger is uninitialized (run `strata init`)"),
    }
    Ok(())
}

/// `strata demo` — append `count` blocks on a timer, then audit.
///
/// Interruptible with Ctrl-C; whatever was appended before the
/// interrupt stays, and the closing audit still runs.
async fn run_demo(args: DemoArgs) -> Result<()> {
    let chain = open_chain(&args.data)?;
    chain.initialize()?;

    let start_height = chain.len()?;
    let mut interval =
        tokio::time::interval(std::time::Duration::from_millis(args.interval_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut appended = 0u64;
    while appended < args.count {
        tokio::select! {
            _ = interval.tick() => {
                let payload = format!("Block #{}", start_height + appended);
                let block = chain.append(payload.into_bytes())?;
                tracing::info!(
                    height = block.height,
                    digest = %block.digest_hex(),
                    "demo block appended"
                );
                appended += 1;
            }
            _ = &mut ctrl_c => {
                tracing::info!(appended, "demo interrupted");
                break;
            }
        }
    }

    let verifier = Verifier::new(chain.store());
    let faulty = verifier.verify_chain()?;
    println!(
        "Appended {appended} block(s); chain length {}.",
        chain.len()?
    );
    if faulty.is_empty() {
        println!("No errors detected.");
        Ok(())
    } else {
        bail!("demo chain failed verification at heights {faulty:?}");
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("strata {}", env!("CARGO_PKG_VERSION"));
    println!(
        "format  v{} ({})",
        strata_ledger::config::FORMAT_VERSION,
        strata_ledger::config::DIGEST_FUNCTION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_args(dir: &tempfile::TempDir) -> DataDirArgs {
        DataDirArgs {
            data_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn open_chain_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let chain = open_chain(&temp_args(&dir)).unwrap();
        assert!(chain.is_empty().unwrap());
        assert!(dir.path().join("db").is_dir());
    }

    #[test]
    fn block_view_renders_hex_digests() {
        let block = Block::genesis(b"view test".to_vec(), 1_700_000_000).unwrap();
        let view = BlockView::from(&block);
        assert_eq!(view.height, 0);
        assert_eq!(view.body, "view test");
        assert_eq!(view.previous_digest, "0".repeat(64));
        assert_eq!(view.digest.len(), 64);
        assert!(view.time.starts_with("2023-11-14"));
    }
}

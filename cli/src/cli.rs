//! # CLI Interface
//!
//! Defines the command-line argument structure for `strata` using
//! `clap` derive. Subcommands: `init`, `append`, `verify`, `show`,
//! `demo`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Strata ledger command-line driver.
///
/// Maintains an append-only, hash-linked block ledger on disk and
/// verifies its integrity. The core never schedules or retries
/// anything; this binary is the caller that does.
#[derive(Parser, Debug)]
#[command(
    name = "strata",
    about = "Append-only hash-linked ledger with tamper detection",
    version,
    propagate_version = true
)]
pub struct StrataCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, env = "STRATA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the strata binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a ledger — creates the data directory and the
    /// genesis block if none exists. Idempotent.
    Init(InitArgs),
    /// Append a single block carrying the given payload.
    Append(AppendArgs),
    /// Audit the full chain and report every faulty height.
    Verify(DataDirArgs),
    /// Inspect the chain: status, a single block, or every block.
    Show(ShowArgs),
    /// Append a batch of demo blocks on a timer, then audit.
    Demo(DemoArgs),
    /// Print version information and exit.
    Version,
}

/// Shared data-directory argument.
#[derive(Args, Debug)]
pub struct DataDirArgs {
    /// Path to the ledger data directory.
    ///
    /// Created on first use if it does not exist.
    #[arg(long, short = 'd', env = "STRATA_DATA_DIR", default_value = ".strata")]
    pub data_dir: PathBuf,
}

/// Arguments for the `init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Genesis block payload. Defaults to the library's documented
    /// default. Ignored when the ledger already has a genesis block.
    #[arg(long)]
    pub genesis_payload: Option<String>,
}

/// Arguments for the `append` subcommand.
#[derive(Args, Debug)]
pub struct AppendArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Payload for the new block (UTF-8; the ledger stores raw bytes).
    #[arg(long, short = 'p')]
    pub payload: String,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Show only the block at this height.
    #[arg(long, conflicts_with = "all")]
    pub height: Option<u64>,

    /// Show every stored block, one JSON line each.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Number of blocks to append.
    #[arg(long, short = 'n', default_value_t = 10)]
    pub count: u64,

    /// Delay between appends, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,
}

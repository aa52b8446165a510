//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{
    DEFAULT_ENDPOINT, DEFAULT_INDEX, DEFAULT_PING_ATTEMPTS, DEFAULT_PING_DELAY_MS,
};

#[derive(Debug, Parser)]
#[command(
    name = "tripflow",
    version,
    about = "Aggregate taxi trip exports into a search index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the aggregate index, waiting for the endpoint to come up
    CreateIndex(CreateIndexArgs),
    /// Run the aggregation pipeline over a trip export
    Run(RunArgs),
    /// Print indexed documents (bounded match-all)
    ReadIndex(ReadIndexArgs),
    /// Convert a Parquet trip export to CSV
    #[cfg(feature = "io-parquet")]
    Convert(ConvertArgs),
}

/// Flags shared by every subcommand that talks to the index.
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Index endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Index name
    #[arg(long, default_value = DEFAULT_INDEX)]
    pub index: String,
}

#[derive(Debug, Args)]
pub struct CreateIndexArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Availability probes to attempt before giving up
    #[arg(long, default_value_t = DEFAULT_PING_ATTEMPTS)]
    pub max_attempts: u32,

    /// Fixed delay between probes, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PING_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Upper bound of extra random delay per probe, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub retry_jitter_ms: u64,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Trip export (CSV) to aggregate
    pub input: PathBuf,

    #[command(flatten)]
    pub index: IndexArgs,

    /// Write rejected rows as CSV (line,error) to this path
    #[arg(long, value_name = "PATH")]
    pub rejects_out: Option<PathBuf>,

    /// Print documents to stdout instead of writing to the index
    #[arg(long)]
    pub dry_run: bool,

    /// Derive document ids from grouping keys so re-runs overwrite
    /// documents instead of appending duplicates
    #[arg(long)]
    pub deterministic_ids: bool,

    /// Cap the worker thread pool (defaults to the number of cores)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ReadIndexArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Maximum number of documents to fetch
    #[arg(long, default_value_t = 1000)]
    pub size: usize,
}

#[cfg(feature = "io-parquet")]
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Parquet trip export to read
    pub input: PathBuf,

    /// CSV path to write
    pub output: PathBuf,
}

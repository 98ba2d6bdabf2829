//! Command line argument parsing for the simvec CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// simvec - embedded vector similarity search
#[derive(Parser, Debug, Clone)]
#[command(name = "simvec")]
#[command(about = "Store embeddings and run cosine similarity search from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SimvecArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Number of search workers (defaults to, and is capped at, the number of CPUs)
    #[arg(short = 'w', long, env = "SIMVEC_WORKERS", global = true)]
    pub workers: Option<usize>,

    /// Snapshot encoding (json or bincode); guessed from the file extension when omitted
    #[arg(long, env = "SIMVEC_SNAPSHOT_FORMAT", global = true)]
    pub snapshot_format: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SimvecArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Insert or replace one record
    Add(AddArgs),

    /// Insert or replace records from a JSON Lines file
    Import(ImportArgs),

    /// Find the records most similar to a vector
    Search(SearchArgs),

    /// Show one record
    Get(GetArgs),

    /// Show store statistics
    Stats(StatsArgs),
}

/// Arguments for adding a record
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Path to the snapshot file (created if missing)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Record identifier
    #[arg(long)]
    pub id: String,

    /// Comma-separated vector components
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub vector: Vec<f32>,

    /// Namespace of the record
    #[arg(short, long, default_value = "")]
    pub namespace: String,

    /// Metadata entry as KEY=VALUE (repeatable)
    #[arg(short, long = "meta", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

/// Arguments for importing records
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// Path to the snapshot file (created if missing)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// JSON Lines file; each line is {"id", "vector", "metadata"?, "namespace"?}
    #[arg(value_name = "RECORDS_FILE")]
    pub records_file: PathBuf,

    /// Skip lines that fail to parse or insert instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Comma-separated query vector components
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub vector: Vec<f32>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "5")]
    pub k: usize,

    /// Only search this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Required metadata entry as KEY=VALUE (repeatable)
    #[arg(long = "filter", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
}

/// Arguments for showing a record
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Path to the snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Record identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Include the stored vector
    #[arg(long)]
    pub with_vector: bool,
}

/// Arguments for store statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Parse a `KEY=VALUE` pair. The value may be empty and may contain `=`.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

//! Command-line parsing for the gauge voting-weight calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::Protocol;
use crate::data::holders::DEFAULT_TOKEN;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gv", version, about = "Gauge voting-weight calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score an epoch's gauges and print/export the voting-weight allocation.
    Score(ScoreArgs),
    /// Sum the USD value of all current gauge bribes.
    Bribes,
    /// Show fees and bribes of one epoch for a protocol.
    Metrics(MetricsArgs),
    /// Rebuild token holder balances from transfer history.
    Holders(HoldersArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    /// Epoch to fetch (prompted when omitted and no snapshot file is given).
    #[arg(short = 'e', long)]
    pub epoch: Option<u64>,

    /// Run configuration JSON (weights, thresholds, overrides, budgets).
    #[arg(short = 'c', long, value_name = "JSON", default_value = "config/run.json")]
    pub config: PathBuf,

    /// Tab-separated multiplier table merged over the config overrides.
    #[arg(long, value_name = "TSV")]
    pub overrides: Option<PathBuf>,

    /// Read the epoch snapshot from a file instead of the API.
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,

    /// Number of pools to print.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Export ranked pools to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full run (metadata + pools) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct MetricsArgs {
    /// Protocol to query.
    #[arg(value_enum)]
    pub protocol: Protocol,

    /// Epoch to show (prompted when omitted).
    #[arg(short = 'e', long)]
    pub epoch: Option<u64>,
}

#[derive(Debug, Parser, Clone)]
pub struct HoldersArgs {
    /// ERC-20 token address.
    #[arg(long, default_value = DEFAULT_TOKEN)]
    pub token: String,

    /// Number of holders to print and export.
    #[arg(long, default_value_t = crate::io::DEFAULT_HOLDER_ROWS)]
    pub top: usize,

    /// Export the top holders to CSV.
    #[arg(long, default_value = "top_holders.csv")]
    pub export: PathBuf,
}

//! Command-line surface of the `energy-ledger` driver.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ledger::AccountId;

/// Per-account energy ledger.
///
/// Records production/consumption readings and reports running totals,
/// in memory or against a CSV journal.
#[derive(Parser, Debug)]
#[command(name = "energy-ledger", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Journal file; overrides `store.journal` from the configuration.
    #[arg(long, global = true)]
    pub journal: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record one reading for an account.
    Record(RecordArgs),

    /// Show an account's records and totals.
    Show(ShowArgs),

    /// Summarize every account in the ledger.
    Report(ReportArgs),

    /// Drive the ledger with synthetic household readings.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Account the reading belongs to.
    #[arg(long)]
    pub account: AccountId,

    /// Energy produced (Wh).
    #[arg(long, allow_negative_numbers = true)]
    pub produced: i128,

    /// Energy consumed (Wh).
    #[arg(long, allow_negative_numbers = true)]
    pub consumed: i128,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(long)]
    pub account: AccountId,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Use a built-in feed preset instead of the configured feed.
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the feed's random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the resulting ledger to a CSV file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

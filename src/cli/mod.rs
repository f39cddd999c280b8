pub mod config;
pub mod fees;
pub mod inspect;
pub mod summary;
pub mod tables;
pub mod trades;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::error::{Result, UtaError};
use crate::importer::{load_files, ImportBatch};

#[derive(Parser)]
#[command(
    name = "utastat",
    version,
    about = "Fee and position summaries from Bybit Unified Trading Account CSV exports."
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wallet balance, fees and positions across one or more exports.
    Summary {
        /// Bybit_AssetChangeDetails_uta_*.csv files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Trading fees, funding and fee refunds in USDT.
    Fees {
        /// Bybit_AssetChangeDetails_uta_*.csv files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Bought and sold coins with the resulting positions.
    Trades {
        /// Bybit_AssetChangeDetails_uta_*.csv files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show how a single export was read: header, detected columns, rows.
    Inspect {
        /// Bybit_AssetChangeDetails_uta_*.csv file
        file: PathBuf,
        /// Number of rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show or change display settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the settings file location and values.
    Show,
    /// Update one or more settings.
    Set {
        /// Decimals for fee figures
        #[arg(long = "fee-decimals")]
        fee_decimals: Option<usize>,
        /// Decimals for balances and quote amounts
        #[arg(long = "amount-decimals")]
        amount_decimals: Option<usize>,
        /// Warnings listed under text reports
        #[arg(long = "max-warnings")]
        max_warnings: Option<usize>,
    },
}

/// Load a batch and fail only when nothing in it was usable.
pub(crate) fn load_batch(files: &[PathBuf]) -> Result<ImportBatch> {
    let batch = load_files(files);
    if batch.is_empty() {
        print_warnings(&batch.warnings, usize::MAX);
        return Err(UtaError::NoUsableFiles);
    }
    Ok(batch)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_warnings(warnings: &[String], max: usize) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("{}", "Parsing notes".yellow().bold());
    for w in warnings.iter().take(max) {
        eprintln!("  - {w}");
    }
    if warnings.len() > max {
        eprintln!("  ... and {} more", warnings.len() - max);
    }
}

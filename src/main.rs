mod amount;
mod cli;
mod columns;
mod error;
mod fees;
mod fmt;
mod importer;
mod models;
mod parser;
mod settings;
mod trades;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Summary { files, json } => cli::summary::run(&files, json),
        Commands::Fees { files, json } => cli::fees::run(&files, json),
        Commands::Trades { files, json } => cli::trades::run(&files, json),
        Commands::Inspect { file, limit, json } => cli::inspect::run(&file, limit, json),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set {
                fee_decimals,
                amount_decimals,
                max_warnings,
            } => cli::config::set(fee_decimals, amount_decimals, max_warnings),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

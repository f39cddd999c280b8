use std::path::PathBuf;

use serde::Serialize;

use super::tables::{coin_summary_table, positions_table};
use super::{load_batch, print_json, print_warnings};
use crate::error::Result;
use crate::models::TradeCoinsResult;
use crate::settings::load_settings;
use crate::trades::trade_coins;

#[derive(Serialize)]
struct TradesReport<'a> {
    #[serde(flatten)]
    trades: TradeCoinsResult,
    warnings: &'a [String],
}

pub fn run(files: &[PathBuf], json: bool) -> Result<()> {
    let settings = load_settings();
    let batch = load_batch(files)?;
    let trades = trade_coins(&batch.rows);

    if json {
        return print_json(&TradesReport {
            trades,
            warnings: &batch.warnings,
        });
    }

    if trades.positions.is_empty() {
        println!("No trades found.");
    } else {
        println!("Bought\n{}", coin_summary_table(&trades.bought, &settings));
        println!("\nSold\n{}", coin_summary_table(&trades.sold, &settings));
        println!("\nPositions\n{}", positions_table(&trades.positions, &settings));
    }
    print_warnings(&batch.warnings, settings.max_warnings);
    Ok(())
}

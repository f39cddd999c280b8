use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use super::tables::{fees_table, files_table, positions_table};
use super::{load_batch, print_json, print_warnings};
use crate::error::Result;
use crate::fees::{fees_paid, last_wallet_balance};
use crate::fmt::amount;
use crate::importer::FileReport;
use crate::models::{FeesBreakdown, TradeCoinsResult};
use crate::settings::load_settings;
use crate::trades::trade_coins;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport<'a> {
    files: &'a [FileReport],
    rows: usize,
    wallet_balance: f64,
    fees: FeesBreakdown,
    trades: TradeCoinsResult,
    warnings: &'a [String],
}

pub fn run(files: &[PathBuf], json: bool) -> Result<()> {
    let settings = load_settings();
    let batch = load_batch(files)?;

    let report = SummaryReport {
        files: &batch.files,
        rows: batch.rows.len(),
        wallet_balance: last_wallet_balance(&batch.rows),
        fees: fees_paid(&batch.rows),
        trades: trade_coins(&batch.rows),
        warnings: &batch.warnings,
    };

    if json {
        return print_json(&report);
    }

    println!("Files\n{}", files_table(report.files));

    let mut overview = Table::new();
    overview.set_header(vec!["Metric", "Value"]);
    overview.add_row(vec![Cell::new("Rows"), Cell::new(report.rows)]);
    overview.add_row(vec![
        Cell::new("Last Balance".bold()),
        Cell::new(format!(
            "{} USD",
            amount(report.wallet_balance, settings.amount_decimals)
        )),
    ]);
    println!("\nAccount\n{overview}");

    println!("\nFees\n{}", fees_table(&report.fees, &settings));

    if report.trades.positions.is_empty() {
        println!("\nNo trades found.");
    } else {
        println!(
            "\nPositions\n{}",
            positions_table(&report.trades.positions, &settings)
        );
    }

    print_warnings(report.warnings, settings.max_warnings);
    Ok(())
}

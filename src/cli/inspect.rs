use std::path::Path;

use comfy_table::{Cell, Table};
use serde::Serialize;

use super::{print_json, print_warnings};
use crate::columns::{ColumnMap, ColumnRole, MetricStrategy};
use crate::error::Result;
use crate::fees::fee_paid_to_quote;
use crate::fmt::fixed;
use crate::importer::{load_file, FileReport};
use crate::models::ParsedRow;
use crate::settings::load_settings;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport<'a> {
    file: &'a FileReport,
    headers: &'a [String],
    columns: &'a ColumnMap,
    strategy: MetricStrategy,
    warnings: &'a [String],
    rows: &'a [ParsedRow],
}

pub fn run(file: &Path, limit: usize, json: bool) -> Result<()> {
    let settings = load_settings();
    let loaded = load_file(file)?;
    let result = &loaded.result;
    let shown = &result.rows[..limit.min(result.rows.len())];

    if json {
        return print_json(&InspectReport {
            file: &loaded.report,
            headers: &result.headers,
            columns: &result.columns,
            strategy: result.strategy,
            warnings: &result.warnings,
            rows: shown,
        });
    }

    println!("{} ({} rows)", loaded.report.name, result.rows.len());
    println!("Headers: {}", result.headers.join(" | "));

    let mut roles = Table::new();
    roles.set_header(vec!["Role", "Column"]);
    for (role, idx) in result.columns.iter() {
        roles.add_row(vec![
            Cell::new(role.name()),
            Cell::new(format!("{} (#{idx})", result.headers[idx])),
        ]);
    }
    println!("\nDetected columns\n{roles}");
    println!("Revenue/cost strategy: {}", result.strategy.label());

    let h = &result.headers;
    let col = |role| result.columns.get(role);
    let mut rows = Table::new();
    rows.set_header(vec!["#", "Time", "Symbol", "Type", "Account", "Fee (USDT)"]);
    for r in shown {
        let fee = if r.txn_type() == "TRADE" {
            fixed(fee_paid_to_quote(r), settings.fee_decimals)
        } else {
            String::new()
        };
        rows.add_row(vec![
            Cell::new(&r.row_id),
            Cell::new(r.cell_at(h, col(ColumnRole::Time)).unwrap_or("")),
            Cell::new(r.cell_at(h, col(ColumnRole::Symbol)).unwrap_or("")),
            Cell::new(r.category.as_deref().unwrap_or("")),
            Cell::new(r.cell_at(h, col(ColumnRole::Account)).unwrap_or("")),
            Cell::new(fee),
        ]);
    }
    println!("\nRows\n{rows}");
    if shown.len() < result.rows.len() {
        println!("({} more rows not shown)", result.rows.len() - shown.len());
    }

    print_warnings(&result.warnings, settings.max_warnings);
    Ok(())
}

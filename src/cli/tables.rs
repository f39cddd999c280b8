use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::fmt::{amount, fixed, qty};
use crate::importer::FileReport;
use crate::models::{CoinPosition, CoinTradeSummary, FeesBreakdown, PositionStatus};
use crate::settings::Settings;

pub fn files_table(files: &[FileReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["File", "Rows", "From", "To"]);
    for f in files {
        table.add_row(vec![
            Cell::new(&f.name),
            Cell::new(f.rows),
            Cell::new(f.first_time.as_deref().unwrap_or("-")),
            Cell::new(f.last_time.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn fees_table(fees: &FeesBreakdown, settings: &Settings) -> Table {
    let d = settings.fee_decimals;
    let mut table = Table::new();
    table.set_header(vec!["Fees", "USDT", "Note"]);
    table.add_row(vec![
        Cell::new("Net Fees".bold()),
        Cell::new(fixed(fees.net_cost_usdt, d).red().bold()),
        Cell::new("Trading cost + Funding paid - Fee refunds"),
    ]);
    table.add_row(vec![
        Cell::new("Trading Fees"),
        Cell::new(fixed(fees.trading_cost_usdt, d).red()),
        Cell::new("Fees paid on trades"),
    ]);
    table.add_row(vec![
        Cell::new("Funding Paid"),
        Cell::new(fixed(fees.funding_cost_usdt, d).red()),
        Cell::new("Funding fees paid"),
    ]);
    table.add_row(vec![
        Cell::new("Funding Received"),
        Cell::new(fixed(fees.funding_received_usdt, d).green()),
        Cell::new("Funding fees received"),
    ]);
    table.add_row(vec![
        Cell::new("Fee Refund"),
        Cell::new(fixed(fees.fee_refund_usdt, d).green()),
        Cell::new("Fee rebates"),
    ]);
    table.add_row(vec![
        Cell::new("Signed Net"),
        Cell::new(fixed(fees.net_fees_usdt, d)),
        Cell::new("Trading + Funding paid + Refunds"),
    ]);
    table
}

pub fn coin_summary_table(items: &[CoinTradeSummary], settings: &Settings) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Coin", "Quote", "Qty", "Quote Amount", "Avg Price", "Trades"]);
    for s in items {
        table.add_row(vec![
            Cell::new(&s.coin),
            Cell::new(&s.quote),
            Cell::new(qty(s.total_qty)),
            Cell::new(amount(s.total_quote_amount, settings.amount_decimals)),
            Cell::new(qty(s.avg_price)),
            Cell::new(s.trades),
        ]);
    }
    table
}

fn status_cell(status: PositionStatus) -> Cell {
    let label = status.label();
    Cell::new(match status {
        PositionStatus::Open => label.yellow(),
        PositionStatus::Closed => label.green(),
        PositionStatus::Partial => label.cyan(),
    })
}

pub fn positions_table(positions: &[CoinPosition], settings: &Settings) -> Table {
    let d = settings.amount_decimals;
    let mut table = Table::new();
    table.set_header(vec![
        "Coin", "Quote", "Bought", "Cost", "Avg Buy", "Sold", "Proceeds", "Avg Sell", "Net Qty",
        "Status",
    ]);
    for p in positions {
        table.add_row(vec![
            Cell::new(&p.coin),
            Cell::new(&p.quote),
            Cell::new(qty(p.buy.qty)),
            Cell::new(amount(p.buy.cost_quote, d)),
            Cell::new(qty(p.buy.avg_price)),
            Cell::new(qty(p.sell.qty)),
            Cell::new(amount(p.sell.proceed_quote, d)),
            Cell::new(qty(p.sell.avg_price)),
            Cell::new(qty(p.net_qty)),
            status_cell(p.status),
        ]);
    }
    table
}

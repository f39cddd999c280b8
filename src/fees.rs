use crate::amount::parse_amount;
use crate::models::{to_upper, FeesBreakdown, ParsedRow};

/// Currency all fee figures are reported in.
pub const FEE_QUOTE: &str = "USDT";

fn amount_of(row: &ParsedRow, name: &str) -> f64 {
    parse_amount(row.field(name).unwrap_or(""))
}

/// Wallet balance of the first row that carries one. Exports list the most
/// recent change first.
pub fn last_wallet_balance(rows: &[ParsedRow]) -> f64 {
    rows.iter()
        .filter_map(|r| r.field("Wallet Balance"))
        .find(|v| !v.trim().is_empty())
        .map(parse_amount)
        .unwrap_or(0.0)
}

/// A trade row's fee expressed in USDT. Fees charged in the base coin are
/// converted at the fill price; any other currency contributes nothing.
pub fn fee_paid_to_quote(row: &ParsedRow) -> f64 {
    let fee = amount_of(row, "Fee Paid");
    if fee == 0.0 {
        return 0.0;
    }

    let currency = row.currency();
    if currency == FEE_QUOTE {
        return fee;
    }

    let contract = to_upper(row.field("Contract").unwrap_or(""));
    let filled_price = amount_of(row, "Filled Price");
    if filled_price != 0.0 {
        if let Some(base) = contract.strip_suffix(FEE_QUOTE) {
            if base == currency {
                return fee * filled_price;
            }
        }
    }
    0.0
}

pub fn fees_paid(rows: &[ParsedRow]) -> FeesBreakdown {
    let mut trading: f64 = 0.0;
    let mut funding_paid: f64 = 0.0;
    let mut funding_received = 0.0;
    let mut fee_refund = 0.0;

    for row in rows {
        match row.txn_type().as_str() {
            "TRADE" => trading += fee_paid_to_quote(row),
            "SETTLEMENT" => {
                let funding = amount_of(row, "Funding");
                if funding < 0.0 {
                    funding_paid += funding;
                } else if funding > 0.0 {
                    funding_received += funding;
                }
            }
            "FEE_REFUND" => fee_refund += amount_of(row, "Change"),
            _ => {}
        }
    }

    let trading_cost = (-trading).max(0.0);
    let funding_cost = (-funding_paid).max(0.0);

    FeesBreakdown {
        trading_fees_usdt: trading,
        funding_paid_usdt: funding_paid,
        funding_received_usdt: funding_received,
        fee_refund_usdt: fee_refund,
        net_fees_usdt: trading + funding_paid + fee_refund,
        trading_cost_usdt: trading_cost,
        funding_cost_usdt: funding_cost,
        net_cost_usdt: (trading_cost + funding_cost - fee_refund).max(0.0),
    }
}

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::amount::parse_amount;
use crate::models::{
    BuySide, CoinPosition, CoinTradeSummary, ParsedRow, PositionStatus, SellSide,
    TradeCoinsResult,
};

/// Quantities at or below this are treated as zero.
pub const EPSILON: f64 = 1e-12;

/// Settlement currencies, tried in this order as contract suffixes.
const QUOTE_COINS: &[&str] = &["USDC", "USDT", "USD"];
const DEFAULT_QUOTE: &str = "USDT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Buy,
    Sell,
}

impl Side {
    fn parse(direction: &str) -> Option<Self> {
        match direction {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            _ => None,
        }
    }
}

pub fn quote_from_contract(contract: &str) -> &'static str {
    QUOTE_COINS
        .iter()
        .find(|q| contract.ends_with(*q))
        .copied()
        .unwrap_or(DEFAULT_QUOTE)
}

fn is_quote_coin(currency: &str) -> bool {
    QUOTE_COINS.contains(&currency)
}

/// One base-coin fill extracted from a trade row.
#[derive(Debug)]
struct Fill {
    side: Side,
    coin: String,
    quote: &'static str,
    qty: f64,
    price: f64,
}

fn fill_from_row(row: &ParsedRow) -> Option<Fill> {
    if row.txn_type() != "TRADE" {
        return None;
    }
    let side = Side::parse(&row.direction())?;

    let currency = row.currency();
    let contract = row.contract();
    if currency.is_empty() || contract.is_empty() {
        return None;
    }
    // quote legs mirror the base leg; counting them would double up
    if is_quote_coin(&currency) {
        return None;
    }

    let qty = parse_amount(row.field("Quantity").unwrap_or("")).abs();
    if qty <= EPSILON {
        return None;
    }
    let price = parse_amount(row.field("Filled Price").unwrap_or(""));
    if price <= EPSILON {
        return None;
    }

    Some(Fill {
        side,
        coin: currency,
        quote: quote_from_contract(&contract),
        qty,
        price,
    })
}

#[derive(Debug, Default, Clone, Copy)]
struct Agg {
    qty: f64,
    quote_amount: f64,
    trades: usize,
}

impl Agg {
    fn avg_price(&self) -> f64 {
        avg(self.quote_amount, self.qty)
    }
}

fn avg(amount: f64, qty: f64) -> f64 {
    if qty > EPSILON {
        amount / qty
    } else {
        0.0
    }
}

type CoinKey = (String, String);

fn summaries(aggs: &BTreeMap<CoinKey, Agg>) -> Vec<CoinTradeSummary> {
    aggs.iter()
        .map(|((coin, quote), a)| CoinTradeSummary {
            coin: coin.clone(),
            quote: quote.clone(),
            total_qty: a.qty,
            total_quote_amount: a.quote_amount,
            avg_price: a.avg_price(),
            trades: a.trades,
        })
        .collect()
}

fn position_status(buy_qty: f64, sell_qty: f64) -> PositionStatus {
    let net = buy_qty - sell_qty;
    if net.abs() <= EPSILON {
        PositionStatus::Closed
    } else if sell_qty > EPSILON && sell_qty < buy_qty - EPSILON {
        PositionStatus::Partial
    } else {
        PositionStatus::Open
    }
}

/// Bought coins, sold coins and the resulting positions, each sorted by coin.
/// Only base-coin trade rows with a positive quantity and fill price count;
/// notional is quantity times fill price.
pub fn trade_coins(rows: &[ParsedRow]) -> TradeCoinsResult {
    let mut buys: BTreeMap<CoinKey, Agg> = BTreeMap::new();
    let mut sells: BTreeMap<CoinKey, Agg> = BTreeMap::new();

    for fill in rows.iter().filter_map(fill_from_row) {
        let book = match fill.side {
            Side::Buy => &mut buys,
            Side::Sell => &mut sells,
        };
        let agg = book.entry((fill.coin, fill.quote.to_string())).or_default();
        agg.qty += fill.qty;
        agg.quote_amount += fill.qty * fill.price;
        agg.trades += 1;
    }
    debug!(buy_pairs = buys.len(), sell_pairs = sells.len(), "Aggregated trade fills");

    let keys: BTreeSet<&CoinKey> = buys.keys().chain(sells.keys()).collect();
    let positions = keys
        .into_iter()
        .map(|key| {
            let buy = buys.get(key).copied().unwrap_or_default();
            let sell = sells.get(key).copied().unwrap_or_default();
            CoinPosition {
                coin: key.0.clone(),
                quote: key.1.clone(),
                buy: BuySide {
                    qty: buy.qty,
                    cost_quote: buy.quote_amount,
                    avg_price: buy.avg_price(),
                },
                sell: SellSide {
                    qty: sell.qty,
                    proceed_quote: sell.quote_amount,
                    avg_price: sell.avg_price(),
                },
                net_qty: buy.qty - sell.qty,
                status: position_status(buy.qty, sell.qty),
            }
        })
        .collect();

    TradeCoinsResult {
        bought: summaries(&buys),
        sold: summaries(&sells),
        positions,
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::columns::{ColumnMap, MetricStrategy};

/// One transaction record as read from an export, before any numeric
/// interpretation. `raw` is keyed by the cleaned header text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRow {
    pub row_id: String,
    pub raw: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ParsedRow {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.raw.get(name).map(String::as_str)
    }

    /// First of `names` present in the row, uppercased and trimmed.
    fn upper_of(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|n| self.field(n))
            .map(to_upper)
            .unwrap_or_default()
    }

    /// `Type`, or the derived category when the export has no `Type` column.
    pub fn txn_type(&self) -> String {
        self.field("Type")
            .or(self.category.as_deref())
            .map(to_upper)
            .unwrap_or_default()
    }

    pub fn direction(&self) -> String {
        self.upper_of(&["Direction", "Side"])
    }

    pub fn currency(&self) -> String {
        self.upper_of(&["Currency"])
    }

    pub fn contract(&self) -> String {
        self.upper_of(&["Contract", "Symbol"])
    }

    /// Cell at a resolved column position, trimmed; `None` when blank.
    pub fn cell_at(&self, headers: &[String], idx: Option<usize>) -> Option<&str> {
        let header = headers.get(idx?)?;
        let value = self.field(header)?.trim();
        (!value.is_empty()).then_some(value)
    }
}

pub fn to_upper(value: &str) -> String {
    value.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
    pub warnings: Vec<String>,
    pub columns: ColumnMap,
    pub strategy: MetricStrategy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesBreakdown {
    /// Usually negative.
    pub trading_fees_usdt: f64,
    pub funding_paid_usdt: f64,
    pub funding_received_usdt: f64,
    pub fee_refund_usdt: f64,
    /// trading + funding paid + refund
    pub net_fees_usdt: f64,

    pub trading_cost_usdt: f64,
    pub funding_cost_usdt: f64,
    pub net_cost_usdt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTradeSummary {
    pub coin: String,
    pub quote: String,
    pub total_qty: f64,
    pub total_quote_amount: f64,
    pub avg_price: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Open,
    Closed,
    Partial,
}

impl PositionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Partial => "PARTIAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySide {
    pub qty: f64,
    pub cost_quote: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellSide {
    pub qty: f64,
    pub proceed_quote: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPosition {
    pub coin: String,
    pub quote: String,
    pub buy: BuySide,
    pub sell: SellSide,
    pub net_qty: f64,
    pub status: PositionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeCoinsResult {
    pub bought: Vec<CoinTradeSummary>,
    pub sold: Vec<CoinTradeSummary>,
    pub positions: Vec<CoinPosition>,
}

#[cfg(test)]
pub(crate) fn row(fields: &[(&str, &str)]) -> ParsedRow {
    ParsedRow {
        row_id: "1".to_string(),
        raw: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        category: None,
    }
}

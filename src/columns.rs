use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    Time,
    Symbol,
    Category,
    Account,
    Quantity,
    Amount,
    Revenue,
    Cost,
    Relieved,
    Unrelieved,
}

impl ColumnRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Symbol => "symbol",
            Self::Category => "category",
            Self::Account => "account",
            Self::Quantity => "quantity",
            Self::Amount => "amount",
            Self::Revenue => "revenue",
            Self::Cost => "cost",
            Self::Relieved => "relieved",
            Self::Unrelieved => "unrelieved",
        }
    }
}

/// Normalized header names tried for each role, highest priority first.
const ROLE_CANDIDATES: &[(ColumnRole, &[&str])] = &[
    (
        ColumnRole::Time,
        &["dateandtimeutc", "datetimeutc", "datetime", "date", "time"],
    ),
    (ColumnRole::Symbol, &["asset", "coin", "currency", "symbol"]),
    (ColumnRole::Category, &["type", "category", "side"]),
    (
        ColumnRole::Account,
        &["account", "accounttype", "wallet", "chain", "status"],
    ),
    (ColumnRole::Quantity, &["qty", "quantity"]),
    (ColumnRole::Amount, &["amount", "qty", "quantity"]),
    (
        ColumnRole::Revenue,
        &["revenue", "income", "pnl", "realizedpnl", "realizedpl", "profit"],
    ),
    (
        ColumnRole::Cost,
        &["cost", "fee", "fees", "commission", "tradingfee"],
    ),
    (
        ColumnRole::Relieved,
        &["relieved", "released", "settled", "realized"],
    ),
    (
        ColumnRole::Unrelieved,
        &[
            "unrelieved",
            "unreleased",
            "unsettled",
            "unrealized",
            "unrealizedpnl",
            "unrealizedpl",
        ],
    ),
];

/// Index of the first candidate found among `headers`.
pub fn pick_column_index(headers: &[String], candidates: &[&str]) -> Option<usize> {
    let keys: Vec<String> = headers.iter().map(|h| normalize_key(h)).collect();
    candidates
        .iter()
        .find_map(|cand| keys.iter().position(|k| k == cand))
}

/// Resolved column positions; roles with no matching header are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnMap(BTreeMap<ColumnRole, usize>);

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Self {
        Self(
            ROLE_CANDIDATES
                .iter()
                .filter_map(|(role, cands)| pick_column_index(headers, cands).map(|i| (*role, i)))
                .collect(),
        )
    }

    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.0.get(&role).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, usize)> + '_ {
        self.0.iter().map(|(r, i)| (*r, *i))
    }

    fn has_explicit_metrics(&self) -> bool {
        [
            ColumnRole::Revenue,
            ColumnRole::Cost,
            ColumnRole::Relieved,
            ColumnRole::Unrelieved,
        ]
        .iter()
        .any(|r| self.get(*r).is_some())
    }

    pub fn metric_strategy(&self) -> MetricStrategy {
        if self.has_explicit_metrics() {
            MetricStrategy::Explicit
        } else if self.get(ColumnRole::Amount).is_some() && self.get(ColumnRole::Category).is_some() {
            MetricStrategy::DepositWithdraw
        } else if self.get(ColumnRole::Quantity).is_some() {
            MetricStrategy::QuantitySign
        } else {
            MetricStrategy::Unavailable
        }
    }
}

/// How a revenue/cost split would be derived for this export's layout.
/// Informational: aggregation reads named fields directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricStrategy {
    Explicit,
    DepositWithdraw,
    QuantitySign,
    Unavailable,
}

impl MetricStrategy {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::DepositWithdraw => Some(
                "Detected Withdraw/Deposit History. Using Type+Amount: revenue=Deposit, cost=Withdraw.",
            ),
            Self::QuantitySign => Some(
                "Detected Asset Change Details. Using QTY sign: revenue=positive, cost=negative.",
            ),
            Self::Explicit | Self::Unavailable => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit metric columns",
            Self::DepositWithdraw => "deposit/withdraw by type + amount",
            Self::QuantitySign => "quantity sign",
            Self::Unavailable => "none",
        }
    }
}

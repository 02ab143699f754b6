//! Position snapshots as written to a strategy's ledger.

use crate::domain::error::ParseError;
use crate::domain::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CASH: &str = "CASH";
pub const NO_TRADE: &str = "no_trade";

/// Symbol (and `CASH`) to held quantity.
pub type Positions = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAction {
    pub action: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub amount: f64,
}

impl TradeAction {
    pub fn no_trade() -> Self {
        Self {
            action: NO_TRADE.to_string(),
            symbol: String::new(),
            amount: 0.0,
        }
    }

    pub fn is_no_trade(&self) -> bool {
        self.action == NO_TRADE
    }
}

/// One immutable ledger record. `id` is scoped to the signature's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub date: String,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_action: Option<TradeAction>,
    #[serde(default)]
    pub positions: Positions,
}

impl PositionSnapshot {
    pub fn no_trade(date: &str, id: i64, positions: Positions) -> Self {
        Self {
            date: date.to_string(),
            id,
            this_action: Some(TradeAction::no_trade()),
            positions,
        }
    }

    pub fn timestamp(&self) -> Result<Timestamp, ParseError> {
        Timestamp::parse(&self.date)
    }

    pub fn quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn cash(&self) -> f64 {
        self.quantity(CASH)
    }
}

//! Per-instrument period profit.

use crate::domain::position::Positions;
use crate::domain::price_resolver::{PriceMap, price_key};
use std::collections::BTreeMap;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// `(sell - buy) * held`, rounded to 4 decimals. Zero when a price is
/// missing or nothing is held.
pub fn period_profit(buy_price: Option<f64>, sell_price: Option<f64>, held_qty: f64) -> f64 {
    match (buy_price, sell_price) {
        (Some(buy), Some(sell)) if held_qty > 0.0 => round4((sell - buy) * held_qty),
        _ => 0.0,
    }
}

/// Profit for every symbol in `symbols`, keyed by bare symbol.
pub fn period_profits(
    buy_prices: &PriceMap,
    sell_prices: &PriceMap,
    positions: &Positions,
    symbols: &[String],
) -> BTreeMap<String, f64> {
    symbols
        .iter()
        .map(|symbol| {
            let key = price_key(symbol);
            let buy = buy_prices.get(&key).copied().flatten();
            let sell = sell_prices.get(&key).copied().flatten();
            let held = positions.get(symbol).copied().unwrap_or(0.0);
            (symbol.clone(), period_profit(buy, sell, held))
        })
        .collect()
}

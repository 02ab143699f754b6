//! Market document preparation.
//!
//! Data-prep helpers run before documents reach the resolver: renaming the
//! vendor's open/close fields to the buy/sell schema, and synthesizing an
//! hourly series from daily bars for markets without intraday history. The
//! expansion is a heuristic; the resolver makes no promises about the bars
//! it produces.

use crate::domain::error::ParseError;
use crate::domain::market_document::{
    Granularity, INFORMATION, META_DATA, MarketDocument, TIME_SERIES_PREFIX, TimeSeries,
};
use crate::domain::price_bar::{
    BUY_PRICE, LEGACY_CLOSE, LEGACY_OPEN, PriceBar, SELL_PRICE, or_zero,
};
use serde_json::Value;
use tracing::debug;

pub const BUY_SELL_INFORMATION: &str =
    "Equities Prices (buy price, high, low, sell price) and Volumes";

/// Session slots, one bar per hour from the 09:15 open.
pub const SESSION_SLOTS: [&str; 7] = [
    "09:15:00", "10:15:00", "11:15:00", "12:15:00", "13:15:00", "14:15:00", "15:15:00",
];

/// Rename `1. open` / `4. close` in the authoritative series of a raw
/// document and update its information line.
pub fn rename_legacy_fields(raw: &mut Value) {
    let Some(doc) = raw.as_object_mut() else {
        return;
    };

    let series_key = doc
        .keys()
        .find(|k| k.starts_with(TIME_SERIES_PREFIX))
        .cloned();
    let Some(bars) = series_key
        .and_then(|key| doc.get_mut(&key))
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    if bars.is_empty() {
        return;
    }

    for bar in bars.values_mut().filter_map(Value::as_object_mut) {
        if let Some(open) = bar.remove(LEGACY_OPEN) {
            bar.insert(BUY_PRICE.to_string(), open);
        }
        if let Some(close) = bar.remove(LEGACY_CLOSE) {
            bar.insert(SELL_PRICE.to_string(), close);
        }
    }

    if let Some(meta) = doc.get_mut(META_DATA).and_then(Value::as_object_mut) {
        meta.insert(
            INFORMATION.to_string(),
            Value::String(BUY_SELL_INFORMATION.to_string()),
        );
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal price text that always keeps a fractional part (`100.0`),
/// matching stores prepared by earlier tooling.
fn price_text(value: f64) -> String {
    format!("{:?}", round2(value))
}

struct DailyFigures {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

fn daily_figures(bar: &PriceBar) -> Result<DailyFigures, ParseError> {
    Ok(DailyFigures {
        open: or_zero(bar.buy_price())?,
        high: or_zero(bar.high_price())?,
        low: or_zero(bar.low_price())?,
        close: or_zero(bar.sell_price())?,
        volume: or_zero(bar.volume())? as i64,
    })
}

/// Buy price for slot `i`: open, high, low, mid of high/low, then the
/// open/close midpoint, ending on the close.
fn slot_price(i: usize, day: &DailyFigures) -> f64 {
    match i {
        0 => day.open,
        1 => day.high,
        2 => day.low,
        3 => (day.high + day.low) / 2.0,
        6 => day.close,
        _ => (day.open + day.close) / 2.0,
    }
}

/// Seven simulated 60-minute bars per daily bar. Missing numbers count as
/// 0; days with unparsable numbers are dropped. Non-daily documents are
/// returned unchanged.
pub fn expand_daily_to_intraday(doc: &MarketDocument) -> MarketDocument {
    let Some(series) = doc.series.as_ref().filter(|s| s.granularity == Granularity::Daily) else {
        return doc.clone();
    };

    let mut hourly = TimeSeries::new(Granularity::Intraday(60));
    for (date, bar) in series.iter() {
        let day = match daily_figures(bar) {
            Ok(day) => day,
            Err(e) => {
                debug!(symbol = %doc.symbol, %date, error = %e, "skipping day in expansion");
                continue;
            }
        };
        for (i, slot) in SESSION_SLOTS.iter().enumerate() {
            let price = price_text(slot_price(i, &day));
            hourly.insert(
                &format!("{date} {slot}"),
                PriceBar {
                    buy: Some(price.clone()),
                    high: Some(price_text(day.high)),
                    low: Some(price_text(day.low)),
                    sell: Some(price),
                    volume: Some(day.volume.div_euclid(7).to_string()),
                },
            );
        }
    }

    let mut expanded = MarketDocument {
        symbol: doc.symbol.clone(),
        meta: doc.meta.clone(),
        series: Some(hourly),
    };
    expanded.set_information(&format!("{BUY_SELL_INFORMATION} (60min simulated)"));
    expanded
}

/// Fold a fresh download into a previously stored document. Bars from
/// `fresh` replace stored bars at the same timestamp; stored bars it lacks
/// are kept. `fresh` metadata wins unless it has none.
pub fn merge_documents(stored: &MarketDocument, fresh: &MarketDocument) -> MarketDocument {
    let mut merged = fresh.clone();
    if merged.meta.is_empty() {
        merged.meta = stored.meta.clone();
        if merged.symbol.is_empty() {
            merged.symbol = stored.symbol.clone();
        }
    }

    let (Some(old), Some(new)) = (&stored.series, &fresh.series) else {
        if merged.series.is_none() {
            merged.series = stored.series.clone();
        }
        return merged;
    };
    if old.granularity != new.granularity {
        debug!(symbol = %merged.symbol, "stored series has another granularity, replacing it");
        return merged;
    }

    let mut series = TimeSeries::new(new.granularity.clone());
    for (ts, bar) in old.iter().chain(new.iter()) {
        series.insert(ts, bar.clone());
    }
    merged.series = Some(series);
    merged
}

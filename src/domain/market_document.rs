//! Market documents: one instrument, its metadata, and one time series.
//!
//! The loader picks the authoritative series once: the first top-level key
//! (document order) that starts with `Time Series`. Its tag decides the
//! granularity.

use crate::domain::price_bar::PriceBar;
use crate::domain::timestamp::normalize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const META_DATA: &str = "Meta Data";
pub const INFORMATION: &str = "1. Information";
pub const SYMBOL: &str = "2. Symbol";
pub const NAME: &str = "2.1. Name";
pub const TIME_SERIES_PREFIX: &str = "Time Series";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Intraday(u32),
    /// A `Time Series (...)` tag we do not interpret; kept for round trips.
    Other(String),
}

impl Granularity {
    /// `Time Series (Daily)` → `Daily`, `Time Series (60min)` → `Intraday(60)`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let rest = tag.strip_prefix(TIME_SERIES_PREFIX)?.trim();
        let inner = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .unwrap_or(rest)
            .trim();
        if inner.eq_ignore_ascii_case("daily") {
            return Some(Granularity::Daily);
        }
        let minutes = inner.strip_suffix("min").map(|m| m.trim().parse::<u32>());
        if let Some(Ok(minutes)) = minutes {
            return Some(Granularity::Intraday(minutes));
        }
        Some(Granularity::Other(inner.to_string()))
    }

    pub fn tag(&self) -> String {
        match self {
            Granularity::Daily => format!("{TIME_SERIES_PREFIX} (Daily)"),
            Granularity::Intraday(m) => format!("{TIME_SERIES_PREFIX} ({m}min)"),
            Granularity::Other(inner) => format!("{TIME_SERIES_PREFIX} ({inner})"),
        }
    }
}

/// Bars in insertion order, keyed by normalized timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub granularity: Granularity,
    bars: Vec<(String, PriceBar)>,
    index: HashMap<String, usize>,
}

impl TimeSeries {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            bars: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert under the normalized key; a later bar for the same key replaces
    /// the earlier one in place.
    pub fn insert(&mut self, timestamp: &str, bar: PriceBar) {
        let key = normalize(timestamp);
        match self.index.get(&key) {
            Some(&i) => self.bars[i].1 = bar,
            None => {
                self.index.insert(key.clone(), self.bars.len());
                self.bars.push((key, bar));
            }
        }
    }

    /// Exact lookup after normalizing the query.
    pub fn get(&self, timestamp: &str) -> Option<&PriceBar> {
        self.index
            .get(&normalize(timestamp))
            .map(|&i| &self.bars[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bars.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceBar)> {
        self.bars.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketDocument {
    pub symbol: String,
    pub meta: Map<String, Value>,
    pub series: Option<TimeSeries>,
}

impl MarketDocument {
    pub fn new(symbol: &str, series: TimeSeries) -> Self {
        let mut meta = Map::new();
        meta.insert(SYMBOL.to_string(), Value::String(symbol.to_string()));
        Self {
            symbol: symbol.to_string(),
            meta,
            series: Some(series),
        }
    }

    /// Returns `None` when the value is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let doc = value.as_object()?;
        let meta = doc
            .get(META_DATA)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let symbol = meta
            .get(SYMBOL)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let series = doc
            .iter()
            .find(|(key, _)| key.starts_with(TIME_SERIES_PREFIX))
            .and_then(|(tag, value)| {
                let bars = value.as_object()?;
                let mut series = TimeSeries::new(Granularity::from_tag(tag)?);
                for (ts, bar) in bars {
                    if let Some(fields) = bar.as_object() {
                        series.insert(ts, PriceBar::from_json(fields));
                    }
                }
                Some(series)
            });

        Some(Self {
            symbol,
            meta,
            series,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(META_DATA.to_string(), Value::Object(self.meta.clone()));
        if let Some(series) = &self.series {
            let bars: Map<String, Value> = series
                .iter()
                .map(|(ts, bar)| (ts.to_string(), Value::Object(bar.to_json())))
                .collect();
            doc.insert(series.granularity.tag(), Value::Object(bars));
        }
        Value::Object(doc)
    }

    pub fn name(&self) -> Option<&str> {
        self.meta
            .get(NAME)
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
    }

    pub fn set_information(&mut self, text: &str) {
        self.meta
            .insert(INFORMATION.to_string(), Value::String(text.to_string()));
    }
}

//! Price bar as stored in market documents.
//!
//! Fields are kept as the source text and coerced on read, so values such as
//! `"1,234.50"` survive until someone asks for a number.

use crate::domain::error::ParseError;
use serde_json::{Map, Value};

pub const BUY_PRICE: &str = "1. buy price";
pub const HIGH: &str = "2. high";
pub const LOW: &str = "3. low";
pub const SELL_PRICE: &str = "4. sell price";
pub const VOLUME: &str = "5. volume";

pub const LEGACY_OPEN: &str = "1. open";
pub const LEGACY_CLOSE: &str = "4. close";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBar {
    pub buy: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub sell: Option<String>,
    pub volume: Option<String>,
}

/// Strip thousands separators and whitespace, then parse.
pub fn coerce_number(raw: &str) -> Result<f64, ParseError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::number(raw))
}

fn field_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn coerce(field: &Option<String>) -> Result<Option<f64>, ParseError> {
    field.as_deref().map(coerce_number).transpose()
}

impl PriceBar {
    pub fn from_json(fields: &Map<String, Value>) -> Self {
        Self {
            buy: field_text(fields, BUY_PRICE),
            high: field_text(fields, HIGH),
            low: field_text(fields, LOW),
            sell: field_text(fields, SELL_PRICE),
            volume: field_text(fields, VOLUME),
        }
    }

    pub fn to_json(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        let pairs = [
            (BUY_PRICE, &self.buy),
            (HIGH, &self.high),
            (LOW, &self.low),
            (SELL_PRICE, &self.sell),
            (VOLUME, &self.volume),
        ];
        for (key, value) in pairs {
            if let Some(text) = value {
                fields.insert(key.to_string(), Value::String(text.clone()));
            }
        }
        fields
    }

    pub fn buy_price(&self) -> Result<Option<f64>, ParseError> {
        coerce(&self.buy)
    }

    pub fn sell_price(&self) -> Result<Option<f64>, ParseError> {
        coerce(&self.sell)
    }

    pub fn high_price(&self) -> Result<Option<f64>, ParseError> {
        coerce(&self.high)
    }

    pub fn low_price(&self) -> Result<Option<f64>, ParseError> {
        coerce(&self.low)
    }

    pub fn volume(&self) -> Result<Option<f64>, ParseError> {
        coerce(&self.volume)
    }
}

/// Legacy schema: a missing numeric reads as 0, an unparsable one still fails.
pub fn or_zero(value: Result<Option<f64>, ParseError>) -> Result<f64, ParseError> {
    value.map(|v| v.unwrap_or(0.0))
}

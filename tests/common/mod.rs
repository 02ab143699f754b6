#![allow(dead_code)]

use agentledger::domain::error::AgentLedgerError;
use agentledger::domain::market_document::MarketDocument;
use agentledger::domain::position::PositionSnapshot;
use agentledger::ports::ledger_port::LedgerPort;
use agentledger::ports::live_quote_port::LiveQuotePort;
use agentledger::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// A raw store document. `bars` are (timestamp, buy price, sell price).
pub fn make_doc(symbol: &str, series_tag: &str, bars: &[(&str, &str, &str)]) -> Value {
    let series: serde_json::Map<String, Value> = bars
        .iter()
        .map(|(ts, buy, sell)| {
            (
                ts.to_string(),
                json!({"1. buy price": buy, "4. sell price": sell}),
            )
        })
        .collect();
    let mut doc = serde_json::Map::new();
    doc.insert("Meta Data".to_string(), json!({"2. Symbol": symbol}));
    doc.insert(series_tag.to_string(), Value::Object(series));
    Value::Object(doc)
}

pub fn write_market_store(dir: &Path, docs: &[Value]) -> PathBuf {
    let path = dir.join("merged.jsonl");
    let content: String = docs.iter().map(|d| format!("{d}\n")).collect();
    fs::write(&path, content).unwrap();
    path
}

pub fn write_ledger_lines(log_root: &Path, signature: &str, lines: &[Value]) {
    let dir = log_root.join(signature).join("position");
    fs::create_dir_all(&dir).unwrap();
    let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
    fs::write(dir.join("position.jsonl"), content).unwrap();
}

/// Scripted live quotes; records which symbols were asked for.
pub struct MockLiveQuotes {
    pub prices: HashMap<String, f64>,
    pub failing: Vec<String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockLiveQuotes {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            failing: Vec::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }
}

impl LiveQuotePort for MockLiveQuotes {
    fn last_traded_price(&self, symbol: &str) -> Result<Option<f64>, AgentLedgerError> {
        self.requested.borrow_mut().push(symbol.to_string());
        if self.failing.iter().any(|s| s == symbol) {
            return Err(AgentLedgerError::Io(std::io::Error::other("quote feed down")));
        }
        Ok(self.prices.get(symbol).copied())
    }
}

/// In-memory ledger keyed by signature; an absent key is a missing store.
pub struct MemoryLedger {
    pub logs: RefCell<HashMap<String, Vec<PositionSnapshot>>>,
}

impl MemoryLedger {
    pub fn with_records(signature: &str, records: Vec<PositionSnapshot>) -> Self {
        let mut logs = HashMap::new();
        logs.insert(signature.to_string(), records);
        Self {
            logs: RefCell::new(logs),
        }
    }
}

impl LedgerPort for MemoryLedger {
    fn read_snapshots(&self, signature: &str) -> Result<Vec<PositionSnapshot>, AgentLedgerError> {
        self.logs
            .borrow()
            .get(signature)
            .cloned()
            .ok_or_else(|| AgentLedgerError::MissingStore {
                path: PathBuf::from(signature),
            })
    }

    fn append_snapshot(
        &self,
        signature: &str,
        snapshot: &PositionSnapshot,
    ) -> Result<(), AgentLedgerError> {
        self.logs
            .borrow_mut()
            .entry(signature.to_string())
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }
}

/// A market store that does not exist.
pub struct NoMarketData;

impl MarketDataPort for NoMarketData {
    fn load_documents(&self) -> Result<Vec<MarketDocument>, AgentLedgerError> {
        Err(AgentLedgerError::MissingStore {
            path: PathBuf::from("merged.jsonl"),
        })
    }
}

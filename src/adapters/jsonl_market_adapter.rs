//! Newline-delimited JSON market document store.

use crate::domain::error::AgentLedgerError;
use crate::domain::market_document::MarketDocument;
use crate::ports::market_data_port::MarketDataPort;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct JsonlMarketAdapter {
    path: PathBuf,
}

impl JsonlMarketAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write one document per line, replacing `path`.
    pub fn write_documents(path: &Path, docs: &[MarketDocument]) -> Result<(), AgentLedgerError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        for doc in docs {
            serde_json::to_writer(&mut writer, &doc.to_value())?;
            writeln!(writer)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), count = docs.len(), "wrote market documents");
        Ok(())
    }
}

impl MarketDataPort for JsonlMarketAdapter {
    fn load_documents(&self) -> Result<Vec<MarketDocument>, AgentLedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AgentLedgerError::MissingStore {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: serde_json::Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(e) => {
                    warn!(path = %self.path.display(), line = lineno + 1, error = %e, "skipping malformed line");
                    continue;
                }
            };
            match MarketDocument::from_value(&value) {
                Some(doc) => docs.push(doc),
                None => {
                    warn!(path = %self.path.display(), line = lineno + 1, "skipping non-document line");
                }
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_document::{Granularity, TimeSeries};
    use crate::domain::price_bar::PriceBar;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_temp_store(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn loads_documents_skipping_blank_and_malformed_lines() {
        let file = create_temp_store(concat!(
            r#"{"Meta Data": {"2. Symbol": "AAPL"}, "Time Series (Daily)": {"2024-01-02": {"1. buy price": "185.0"}}}"#,
            "\n\n",
            "{not json\n",
            r#"{"Meta Data": {"2. Symbol": "MSFT"}, "Time Series (60min)": {"2024-01-02 9:15:00": {"1. buy price": "370.5"}}}"#,
            "\n",
        ));
        let docs = JsonlMarketAdapter::new(file.path().to_path_buf())
            .load_documents()
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].symbol, "AAPL");
        let series = docs[1].series.as_ref().unwrap();
        assert_eq!(series.granularity, Granularity::Intraday(60));
        assert!(series.get("2024-01-02 09:15:00").is_some());
    }

    #[test]
    fn missing_file_is_missing_store() {
        let adapter = JsonlMarketAdapter::new(PathBuf::from("/nonexistent/merged.jsonl"));
        let err = adapter.load_documents().unwrap_err();
        assert!(err.is_missing_store());
    }

    #[test]
    fn written_documents_load_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prepared").join("merged.jsonl");

        let mut series = TimeSeries::new(Granularity::Daily);
        series.insert(
            "2024-01-02",
            PriceBar {
                buy: Some("10.5".to_string()),
                ..PriceBar::default()
            },
        );
        let doc = MarketDocument::new("TCS", series);

        JsonlMarketAdapter::write_documents(&path, std::slice::from_ref(&doc)).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);

        let loaded = JsonlMarketAdapter::new(path).load_documents().unwrap();
        assert_eq!(loaded, vec![doc]);
    }
}

//! Append-only JSONL position ledger, one file per signature.

use crate::domain::error::AgentLedgerError;
use crate::domain::position::PositionSnapshot;
use crate::ports::ledger_port::LedgerPort;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct JsonlLedgerAdapter {
    log_root: PathBuf,
}

impl JsonlLedgerAdapter {
    pub fn new(log_root: PathBuf) -> Self {
        Self { log_root }
    }

    /// `<log_root>/<signature>/position/position.jsonl`
    pub fn ledger_path(&self, signature: &str) -> PathBuf {
        self.log_root
            .join(signature)
            .join("position")
            .join("position.jsonl")
    }
}

impl LedgerPort for JsonlLedgerAdapter {
    fn read_snapshots(&self, signature: &str) -> Result<Vec<PositionSnapshot>, AgentLedgerError> {
        let path = self.ledger_path(signature);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AgentLedgerError::MissingStore { path });
            }
            Err(e) => return Err(e.into()),
        };

        let mut snapshots = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<PositionSnapshot>(line) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    warn!(path = %path.display(), line = lineno + 1, error = %e, "skipping malformed ledger record");
                }
            }
        }
        Ok(snapshots)
    }

    fn append_snapshot(
        &self,
        signature: &str,
        snapshot: &PositionSnapshot,
    ) -> Result<(), AgentLedgerError> {
        let path = self.ledger_path(signature);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(snapshot)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{line}")?;
        debug!(signature, date = %snapshot.date, id = snapshot.id, "appended ledger record");
        Ok(())
    }
}

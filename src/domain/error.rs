//! Domain error types.

use std::path::PathBuf;

/// A timestamp or numeric field that could not be interpreted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot parse {kind} from {input:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub input: String,
}

impl ParseError {
    pub fn timestamp(input: &str) -> Self {
        Self {
            kind: "timestamp",
            input: input.to_string(),
        }
    }

    pub fn number(input: &str) -> Self {
        Self {
            kind: "number",
            input: input.to_string(),
        }
    }
}

/// Top-level error type for agentledger.
#[derive(Debug, thiserror::Error)]
pub enum AgentLedgerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("store not found: {}", path.display())]
    MissingStore { path: PathBuf },

    #[error("{raw} matches several requested symbols: {}", candidates.join(", "))]
    AmbiguousMatch { raw: String, candidates: Vec<String> },

    #[error("snapshot id {id} for {date} is not above latest id {latest}")]
    IdNotMonotonic { date: String, id: i64, latest: i64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AgentLedgerError {
    pub fn is_missing_store(&self) -> bool {
        matches!(self, AgentLedgerError::MissingStore { .. })
    }
}

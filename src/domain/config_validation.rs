//! Configuration validation and path resolution.
//!
//! Reads the `[market]` and `[ledger]` sections and produces an
//! [`AgentConfig`] that every entry point receives explicitly.

use crate::domain::error::AgentLedgerError;
use crate::domain::instrument::Market;
use crate::ports::config_port::ConfigPort;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_PATH: &str = "./data/agent_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub market: Market,
    pub market_data_path: PathBuf,
    pub ledger_root: PathBuf,
    pub signature: String,
}

pub fn load_agent_config(
    config: &dyn ConfigPort,
    base_dir: &Path,
) -> Result<AgentConfig, AgentLedgerError> {
    let market = validate_market(config)?;
    let signature = validate_signature(config)?;
    let market_data_path = resolve_market_data_path(config, market, base_dir);
    let log_path = non_empty(config, "ledger", "log_path")
        .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());

    Ok(AgentConfig {
        market,
        market_data_path,
        ledger_root: resolve_ledger_root(&log_path, base_dir),
        signature,
    })
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_market(config: &dyn ConfigPort) -> Result<Market, AgentLedgerError> {
    match non_empty(config, "market", "market") {
        None => Ok(Market::Us),
        Some(s) => s.parse().map_err(|_| AgentLedgerError::ConfigInvalid {
            section: "market".to_string(),
            key: "market".to_string(),
            reason: format!("unknown market {s:?}, expected us, cn or in"),
        }),
    }
}

fn validate_signature(config: &dyn ConfigPort) -> Result<String, AgentLedgerError> {
    let Some(signature) = non_empty(config, "ledger", "signature") else {
        return Err(AgentLedgerError::ConfigMissing {
            section: "ledger".to_string(),
            key: "signature".to_string(),
        });
    };
    if signature.contains(['/', '\\']) || signature == "." || signature == ".." {
        return Err(AgentLedgerError::ConfigInvalid {
            section: "ledger".to_string(),
            key: "signature".to_string(),
            reason: "signature must be a single path component".to_string(),
        });
    }
    Ok(signature)
}

fn resolve_market_data_path(config: &dyn ConfigPort, market: Market, base_dir: &Path) -> PathBuf {
    if let Some(explicit) = non_empty(config, "market", "merged_path") {
        return base_dir.join(explicit);
    }
    let data_dir = non_empty(config, "market", "data_dir")
        .map(|dir| base_dir.join(dir))
        .unwrap_or_else(|| base_dir.join("data"));
    data_dir.join(market.default_store_file())
}

/// Absolute paths are kept; relative ones lose a leading `./data/` and land
/// under `<base_dir>/data`.
pub fn resolve_ledger_root(log_path: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(log_path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = log_path.strip_prefix("./data/").unwrap_or(log_path);
    base_dir.join("data").join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_resolves_paths() {
        let config = make_config(
            r#"
[market]
market = nse
data_dir = ./data

[ledger]
log_path = ./data/agent_data
signature = momentum-v1
"#,
        );
        let resolved = load_agent_config(&config, Path::new("/srv/agent")).unwrap();
        assert_eq!(resolved.market, Market::In);
        assert_eq!(
            resolved.market_data_path,
            PathBuf::from("/srv/agent/data/merged_in.jsonl")
        );
        assert_eq!(resolved.ledger_root, PathBuf::from("/srv/agent/data/agent_data"));
        assert_eq!(resolved.signature, "momentum-v1");
    }

    #[test]
    fn defaults_apply_when_optional_keys_absent() {
        let config = make_config("[ledger]\nsignature = s1\n");
        let resolved = load_agent_config(&config, Path::new("/base")).unwrap();
        assert_eq!(resolved.market, Market::Us);
        assert_eq!(resolved.market_data_path, PathBuf::from("/base/data/merged.jsonl"));
        assert_eq!(resolved.ledger_root, PathBuf::from("/base/data/agent_data"));
    }

    #[test]
    fn explicit_merged_path_wins() {
        let config = make_config(
            "[market]\nmarket = cn\ndata_dir = ignored\nmerged_path = /feeds/cn.jsonl\n[ledger]\nsignature = s1\n",
        );
        let resolved = load_agent_config(&config, Path::new("/base")).unwrap();
        assert_eq!(resolved.market_data_path, PathBuf::from("/feeds/cn.jsonl"));
    }

    #[test]
    fn absolute_log_path_is_kept() {
        assert_eq!(
            resolve_ledger_root("/var/log/agents", Path::new("/base")),
            PathBuf::from("/var/log/agents")
        );
        assert_eq!(
            resolve_ledger_root("runs/today", Path::new("/base")),
            PathBuf::from("/base/data/runs/today")
        );
    }

    #[test]
    fn missing_signature_fails() {
        let config = make_config("[market]\nmarket = us\n");
        let err = load_agent_config(&config, Path::new("/base")).unwrap_err();
        assert!(matches!(err, AgentLedgerError::ConfigMissing { key, .. } if key == "signature"));
    }

    #[test]
    fn signature_with_separator_fails() {
        let config = make_config("[ledger]\nsignature = ../escape\n");
        let err = load_agent_config(&config, Path::new("/base")).unwrap_err();
        assert!(matches!(err, AgentLedgerError::ConfigInvalid { key, .. } if key == "signature"));
    }

    #[test]
    fn unknown_market_fails() {
        let config = make_config("[market]\nmarket = lse\n[ledger]\nsignature = s1\n");
        let err = load_agent_config(&config, Path::new("/base")).unwrap_err();
        assert!(matches!(err, AgentLedgerError::ConfigInvalid { key, .. } if key == "market"));
    }
}

//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod jsonl_ledger_adapter;
pub mod jsonl_market_adapter;

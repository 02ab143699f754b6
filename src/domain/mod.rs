//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod instrument;
pub mod market_document;
pub mod position;
pub mod position_ledger;
pub mod preparation;
pub mod price_bar;
pub mod price_resolver;
pub mod profit;
pub mod timestamp;
pub mod timestamp_index;
pub mod universe;

//! Port traits: the seams between domain logic and storage or providers.

pub mod config_port;
pub mod ledger_port;
pub mod live_quote_port;
pub mod market_data_port;

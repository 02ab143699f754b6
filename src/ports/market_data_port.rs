//! Market document store port trait.

use crate::domain::error::AgentLedgerError;
use crate::domain::market_document::MarketDocument;

pub trait MarketDataPort {
    /// Every document in the store, in store order.
    ///
    /// Returns [`AgentLedgerError::MissingStore`] when the store does not exist.
    fn load_documents(&self) -> Result<Vec<MarketDocument>, AgentLedgerError>;
}

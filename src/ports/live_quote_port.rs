//! Live quote provider port trait.

use crate::domain::error::AgentLedgerError;

pub trait LiveQuotePort {
    /// Last traded price, `None` when the provider has no quote.
    fn last_traded_price(&self, symbol: &str) -> Result<Option<f64>, AgentLedgerError>;
}

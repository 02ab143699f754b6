//! Position ledger store port trait.

use crate::domain::error::AgentLedgerError;
use crate::domain::position::PositionSnapshot;

/// Append-only snapshot storage, one log per strategy signature.
pub trait LedgerPort {
    /// All snapshots for `signature` in append order.
    ///
    /// Returns [`AgentLedgerError::MissingStore`] when the log does not exist.
    fn read_snapshots(&self, signature: &str) -> Result<Vec<PositionSnapshot>, AgentLedgerError>;

    /// Append one snapshot. Never rewrites existing records.
    fn append_snapshot(
        &self,
        signature: &str,
        snapshot: &PositionSnapshot,
    ) -> Result<(), AgentLedgerError>;
}

//! Holdings reconstruction from a strategy's append-only snapshot log.
//!
//! The log is not guaranteed to be sorted by date, so every query sorts by
//! (parsed date, id). Records whose date label does not parse are ignored.

use crate::domain::error::AgentLedgerError;
use crate::domain::position::{PositionSnapshot, Positions};
use crate::domain::timestamp::{Timestamp, normalize};
use crate::domain::timestamp_index::resolve_previous;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::market_data_port::MarketDataPort;
use tracing::{debug, info, warn};

pub struct PositionLedger<'a> {
    store: &'a dyn LedgerPort,
    market: &'a dyn MarketDataPort,
}

/// Highest id among records dated exactly `date`.
fn latest_on(snapshots: &[PositionSnapshot], date: Timestamp) -> Option<&PositionSnapshot> {
    snapshots
        .iter()
        .filter(|s| s.timestamp().ok() == Some(date))
        .max_by_key(|s| s.id)
}

/// Last record by (date, id) among those strictly before `date`.
fn last_before(
    snapshots: &[PositionSnapshot],
    date: Timestamp,
    skip_empty: bool,
) -> Option<&PositionSnapshot> {
    snapshots
        .iter()
        .filter(|s| !(skip_empty && s.positions.is_empty()))
        .filter_map(|s| s.timestamp().ok().map(|ts| (ts.instant(), s)))
        .filter(|(instant, _)| *instant < date.instant())
        .max_by_key(|(instant, s)| (*instant, s.id))
        .map(|(_, s)| s)
}

impl<'a> PositionLedger<'a> {
    pub fn new(store: &'a dyn LedgerPort, market: &'a dyn MarketDataPort) -> Self {
        Self { store, market }
    }

    fn snapshots(&self, signature: &str) -> Result<Vec<PositionSnapshot>, AgentLedgerError> {
        match self.store.read_snapshots(signature) {
            Ok(snapshots) => Ok(snapshots),
            Err(AgentLedgerError::MissingStore { path }) => {
                warn!(signature, path = %path.display(), "position ledger not found");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Holdings entering `date`: the last snapshot dated strictly before it.
    pub fn entering_position(
        &self,
        date: &str,
        signature: &str,
    ) -> Result<Positions, AgentLedgerError> {
        let target = Timestamp::parse(date)?;
        let snapshots = self.snapshots(signature)?;
        Ok(last_before(&snapshots, target, false)
            .map(|s| s.positions.clone())
            .unwrap_or_default())
    }

    /// Most recent holdings at or before `date`, with the id of the record.
    ///
    /// Tries the latest record on `date`, then the latest record on the
    /// previous trading instant, then the latest non-empty record before
    /// `date`. Returns `({}, -1)` when all three come up empty.
    pub fn latest_position(
        &self,
        date: &str,
        signature: &str,
    ) -> Result<(Positions, i64), AgentLedgerError> {
        let target = Timestamp::parse(date)?;
        let snapshots = self.snapshots(signature)?;
        if snapshots.is_empty() {
            return Ok((Positions::new(), -1));
        }

        if let Some(s) = latest_on(&snapshots, target) {
            return Ok((s.positions.clone(), s.id));
        }

        let previous = resolve_previous(self.market, date)?;
        if let Some(s) = latest_on(&snapshots, previous) {
            debug!(signature, %target, %previous, id = s.id, "latest position from previous trading instant");
            return Ok((s.positions.clone(), s.id));
        }

        match last_before(&snapshots, target, true) {
            Some(s) => {
                debug!(signature, %target, date = %s.date, id = s.id, "latest position from ledger scan");
                Ok((s.positions.clone(), s.id))
            }
            None => Ok((Positions::new(), -1)),
        }
    }

    /// Carry the latest holdings forward under `date` with a no-trade marker.
    pub fn append_no_trade(
        &self,
        date: &str,
        signature: &str,
    ) -> Result<PositionSnapshot, AgentLedgerError> {
        let (positions, id) = self.latest_position(date, signature)?;
        let snapshot = PositionSnapshot::no_trade(&normalize(date.trim()), id + 1, positions);
        self.store.append_snapshot(signature, &snapshot)?;
        info!(signature, date = %snapshot.date, id = snapshot.id, "appended no-trade snapshot");
        Ok(snapshot)
    }

    /// Append a snapshot produced by the trading loop. Its id must be above
    /// every id already logged for the same date.
    pub fn append_snapshot(
        &self,
        signature: &str,
        snapshot: &PositionSnapshot,
    ) -> Result<(), AgentLedgerError> {
        let date = snapshot.timestamp()?;
        let snapshots = self.snapshots(signature)?;
        if let Some(latest) = latest_on(&snapshots, date) {
            if snapshot.id <= latest.id {
                return Err(AgentLedgerError::IdNotMonotonic {
                    date: snapshot.date.clone(),
                    id: snapshot.id,
                    latest: latest.id,
                });
            }
        }
        self.store.append_snapshot(signature, snapshot)
    }
}

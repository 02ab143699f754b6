//! Known trading instants and "latest strictly before" resolution.
//!
//! The index is rebuilt from the document store on every resolution call.
//! When the store is missing or has nothing earlier than the target, the
//! weekday heuristic in [`Timestamp::fallback_previous`] answers instead.

use crate::domain::error::AgentLedgerError;
use crate::domain::market_document::MarketDocument;
use crate::domain::timestamp::Timestamp;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct TimestampIndex {
    known: BTreeSet<Timestamp>,
}

impl TimestampIndex {
    /// Union of every document's series keys. Keys that do not parse are
    /// left out.
    pub fn from_documents(docs: &[MarketDocument]) -> Self {
        docs.iter()
            .filter_map(|doc| doc.series.as_ref())
            .flat_map(|series| series.keys())
            .filter_map(|key| Timestamp::parse(key).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.known.contains(ts)
    }

    /// The latest known instant strictly earlier than `target`.
    pub fn previous_trading_instant(&self, target: Timestamp) -> Option<Timestamp> {
        self.known
            .range(..target)
            .rev()
            .find(|ts| ts.instant() < target.instant())
            .copied()
    }

    /// Distinct calendar dates, ascending.
    pub fn trading_days(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self.known.iter().map(|ts| ts.date()).collect();
        days.into_iter().collect()
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.known.iter().any(|ts| ts.date() == date)
    }
}

impl FromIterator<Timestamp> for TimestampIndex {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self {
            known: iter.into_iter().collect(),
        }
    }
}

/// Load every document, mapping a missing store to `None`.
pub(crate) fn load_store(
    store: &dyn MarketDataPort,
) -> Result<Option<Vec<MarketDocument>>, AgentLedgerError> {
    match store.load_documents() {
        Ok(docs) => Ok(Some(docs)),
        Err(AgentLedgerError::MissingStore { path }) => {
            warn!(path = %path.display(), "market document store not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Previous trading instant for `target` among `docs`, rendered with the
/// target's granularity. `None` docs means the store is missing.
pub fn previous_in(docs: Option<&[MarketDocument]>, target: Timestamp) -> Timestamp {
    let Some(docs) = docs else {
        return target.fallback_previous();
    };

    let index = TimestampIndex::from_documents(docs);
    match index.previous_trading_instant(target) {
        Some(prev) => {
            let prev = target.shaped_like(prev);
            debug!(%target, previous = %prev, "resolved previous trading instant");
            prev
        }
        None => {
            let prev = target.fallback_previous();
            warn!(
                %target,
                fallback = %prev,
                known = index.len(),
                "no earlier trading instant indexed, using weekday fallback"
            );
            prev
        }
    }
}

/// Load the store and resolve the previous trading instant for `target`.
/// `target` must parse; a malformed one is returned as an error.
pub fn resolve_previous(
    store: &dyn MarketDataPort,
    target: &str,
) -> Result<Timestamp, AgentLedgerError> {
    let target = Timestamp::parse(target)?;
    let docs = load_store(store)?;
    Ok(previous_in(docs.as_deref(), target))
}

/// Whether any document carries `date` (exact instant, or any bar on that
/// calendar day for a date-only query).
pub fn is_trading_day(store: &dyn MarketDataPort, date: &str) -> Result<bool, AgentLedgerError> {
    let target = Timestamp::parse(date)?;
    let Some(docs) = load_store(store)? else {
        return Ok(false);
    };
    let index = TimestampIndex::from_documents(&docs);
    Ok(match target {
        Timestamp::Date(d) => index.has_date(d),
        Timestamp::DateTime(_) => index.contains(&target),
    })
}

pub fn all_trading_days(store: &dyn MarketDataPort) -> Result<Vec<NaiveDate>, AgentLedgerError> {
    Ok(load_store(store)?
        .map(|docs| TimestampIndex::from_documents(&docs).trading_days())
        .unwrap_or_default())
}

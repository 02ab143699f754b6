//! Trading timestamps: hour normalization, parsing and the weekday fallback.
//!
//! Market data and ledger labels come in two shapes, `YYYY-MM-DD` and
//! `YYYY-MM-DD HH:MM:SS`. Some sources write the hour without padding
//! (`9:15:00`), so every comparison goes through [`normalize`] first.

use crate::domain::error::ParseError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zero-pad the hour of a `date time` string. Date-only strings and strings
/// whose time part is not `H:M:S` are returned unchanged.
pub fn normalize(ts: &str) -> String {
    let Some((date, time)) = ts.split_once(' ') else {
        return ts.to_string();
    };
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() != 3 {
        return ts.to_string();
    }
    format!("{} {:0>2}:{}:{}", date, parts[0], parts[1], parts[2])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Timestamp {
    /// Normalize then parse, picking the format by the presence of a time part.
    pub fn parse(ts: &str) -> Result<Self, ParseError> {
        let normalized = normalize(ts.trim());
        if normalized.contains(' ') {
            NaiveDateTime::parse_from_str(&normalized, DATE_TIME_FORMAT)
                .map(Timestamp::DateTime)
                .map_err(|_| ParseError::timestamp(ts))
        } else {
            NaiveDate::parse_from_str(&normalized, DATE_FORMAT)
                .map(Timestamp::Date)
                .map_err(|_| ParseError::timestamp(ts))
        }
    }

    /// Chronological value; a bare date is midnight of that day.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            Timestamp::Date(d) => d.and_time(NaiveTime::default()),
            Timestamp::DateTime(dt) => *dt,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Timestamp::Date(d) => *d,
            Timestamp::DateTime(dt) => dt.date(),
        }
    }

    pub fn is_date_only(&self) -> bool {
        matches!(self, Timestamp::Date(_))
    }

    /// Render `other` with this timestamp's granularity.
    pub fn shaped_like(&self, other: Timestamp) -> Timestamp {
        match self {
            Timestamp::Date(_) => Timestamp::Date(other.date()),
            Timestamp::DateTime(_) => Timestamp::DateTime(other.instant()),
        }
    }

    /// Degraded-mode "previous" used when no index of known timestamps
    /// exists. Approximate: ignores holidays and intraday sessions.
    ///
    /// Date-only values step back a day at a time until a weekday; date+time
    /// values step back exactly one hour.
    pub fn fallback_previous(&self) -> Timestamp {
        match self {
            Timestamp::Date(d) => {
                let mut prev = *d - Duration::days(1);
                while matches!(prev.weekday(), Weekday::Sat | Weekday::Sun) {
                    prev -= Duration::days(1);
                }
                Timestamp::Date(prev)
            }
            Timestamp::DateTime(dt) => Timestamp::DateTime(*dt - Duration::hours(1)),
        }
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant()
            .cmp(&other.instant())
            .then_with(|| self.is_date_only().cmp(&other.is_date_only()).reverse())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Timestamp::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
        }
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

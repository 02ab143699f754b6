//! Markets and instrument-identifier matching.

use crate::domain::error::{AgentLedgerError, ParseError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    Us,
    Cn,
    In,
}

impl Market {
    /// Bare and suffixed symbols (`INFY` / `INFY.BSE`) name the same instrument.
    pub fn suffix_agnostic(&self) -> bool {
        matches!(self, Market::In)
    }

    pub fn supports_live_quotes(&self) -> bool {
        matches!(self, Market::In)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Market::Us => "us",
            Market::Cn => "cn",
            Market::In => "in",
        }
    }

    pub fn default_store_file(&self) -> &'static str {
        match self {
            Market::In => "merged_in.jsonl",
            Market::Us | Market::Cn => "merged.jsonl",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Market {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(Market::Us),
            "cn" => Ok(Market::Cn),
            "in" | "nse" => Ok(Market::In),
            _ => Err(ParseError {
                kind: "market",
                input: s.to_string(),
            }),
        }
    }
}

/// Everything before the first `.`.
pub fn bare_symbol(raw: &str) -> &str {
    raw.split_once('.').map_or(raw, |(bare, _)| bare)
}

pub fn match_instrument(raw_symbol: &str, requested_symbol: &str, market: Market) -> bool {
    if market.suffix_agnostic() {
        requested_symbol == raw_symbol || requested_symbol == bare_symbol(raw_symbol)
    } else {
        requested_symbol == raw_symbol
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolMatch<'a> {
    NoMatch,
    Unique(&'a str),
    /// Several requested symbols match one document; the first in the
    /// caller's order is chosen.
    Ambiguous {
        chosen: &'a str,
        candidates: Vec<&'a str>,
    },
}

impl<'a> SymbolMatch<'a> {
    pub fn chosen(&self) -> Option<&'a str> {
        match self {
            SymbolMatch::NoMatch => None,
            SymbolMatch::Unique(s) => Some(*s),
            SymbolMatch::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }

    pub fn ambiguity(&self, raw_symbol: &str) -> Option<AgentLedgerError> {
        match self {
            SymbolMatch::Ambiguous { candidates, .. } => Some(AgentLedgerError::AmbiguousMatch {
                raw: raw_symbol.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
            _ => None,
        }
    }
}

/// Which requested symbol (if any) a document's raw symbol answers for.
pub fn resolve_requested<'a>(
    raw_symbol: &str,
    requested: &'a [String],
    market: Market,
) -> SymbolMatch<'a> {
    let mut candidates: Vec<&'a str> = Vec::new();
    for wanted in requested {
        if match_instrument(raw_symbol, wanted, market) && !candidates.contains(&wanted.as_str()) {
            candidates.push(wanted.as_str());
        }
    }
    match candidates.len() {
        0 => SymbolMatch::NoMatch,
        1 => SymbolMatch::Unique(candidates[0]),
        _ => SymbolMatch::Ambiguous {
            chosen: candidates[0],
            candidates,
        },
    }
}

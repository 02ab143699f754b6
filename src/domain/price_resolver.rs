//! Price lookups against the market document store.
//!
//! Results are keyed `SYMBOL_price`, with `None` standing for "no usable
//! price" so the trading loop can carry on with partial information.

use crate::domain::error::AgentLedgerError;
use crate::domain::instrument::{Market, resolve_requested};
use crate::domain::market_document::MarketDocument;
use crate::domain::timestamp::Timestamp;
use crate::domain::timestamp_index::{load_store, previous_in};
use crate::ports::live_quote_port::LiveQuotePort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const PRICE_SUFFIX: &str = "_price";

pub type PriceMap = BTreeMap<String, Option<f64>>;

pub fn price_key(symbol: &str) -> String {
    format!("{symbol}{PRICE_SUFFIX}")
}

pub struct PriceResolver<'a> {
    store: &'a dyn MarketDataPort,
    market: Market,
    live: Option<&'a dyn LiveQuotePort>,
    today: NaiveDate,
}

impl<'a> PriceResolver<'a> {
    pub fn new(store: &'a dyn MarketDataPort, market: Market) -> Self {
        Self {
            store,
            market,
            live: None,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_live_quotes(mut self, live: &'a dyn LiveQuotePort) -> Self {
        self.live = Some(live);
        self
    }

    /// Override the calendar day treated as "today" by the live path.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The requested symbol `doc` answers for, warning on ambiguity.
    fn match_document<'s>(&self, doc: &MarketDocument, requested: &'s [String]) -> Option<&'s str> {
        let found = resolve_requested(&doc.symbol, requested, self.market);
        if let Some(err) = found.ambiguity(&doc.symbol) {
            warn!(market = %self.market, chosen = ?found.chosen(), "{err}");
        }
        found.chosen()
    }

    /// Live quotes for "today" in markets that have them. Only priced
    /// symbols are returned.
    fn live_prices(&self, target: Timestamp, symbols: &[String]) -> PriceMap {
        let mut results = PriceMap::new();
        let Some(live) = self.live else {
            return results;
        };
        if !self.market.supports_live_quotes() || target.date() != self.today {
            return results;
        }
        for symbol in symbols {
            match live.last_traded_price(symbol) {
                Ok(Some(price)) => {
                    results.insert(price_key(symbol), Some(price));
                }
                Ok(None) => {}
                Err(e) => warn!(symbol = %symbol, error = %e, "live quote failed"),
            }
        }
        results
    }

    /// Buy price of each requested symbol at exactly `target_ts`.
    ///
    /// Symbols with no matching document are left out; a matched document
    /// with no bar at `target_ts`, or an unparsable price, maps to `None`.
    pub fn get_price_at(
        &self,
        target_ts: &str,
        symbols: &[String],
    ) -> Result<PriceMap, AgentLedgerError> {
        let target = Timestamp::parse(target_ts)?;
        let mut results = self.live_prices(target, symbols);
        let remaining: Vec<String> = symbols
            .iter()
            .filter(|s| !results.contains_key(&price_key(s)))
            .cloned()
            .collect();
        if remaining.is_empty() {
            debug!(%target, count = results.len(), "all prices served live");
            return Ok(results);
        }

        let Some(docs) = load_store(self.store)? else {
            return Ok(results);
        };
        let key = target.to_string();
        for doc in &docs {
            let Some(wanted) = self.match_document(doc, &remaining) else {
                continue;
            };
            let Some(series) = &doc.series else {
                continue;
            };
            let price = match series.get(&key).map(|bar| bar.buy_price()) {
                Some(Ok(price)) => price,
                Some(Err(e)) => {
                    debug!(symbol = %doc.symbol, error = %e, "unusable buy price");
                    None
                }
                None => None,
            };
            results.insert(price_key(wanted), price);
        }
        Ok(results)
    }

    /// Buy and sell prices at the trading instant before `target_ts`.
    ///
    /// Every requested symbol gets an entry in both maps. If either field of
    /// a bar fails to parse, both prices for that symbol are `None`.
    pub fn get_prev_prices(
        &self,
        target_ts: &str,
        symbols: &[String],
    ) -> Result<(PriceMap, PriceMap), AgentLedgerError> {
        let target = Timestamp::parse(target_ts)?;
        let Some(docs) = load_store(self.store)? else {
            return Ok((PriceMap::new(), PriceMap::new()));
        };
        let previous = previous_in(Some(docs.as_slice()), target);
        let key = previous.to_string();

        let mut buy: PriceMap = symbols.iter().map(|s| (price_key(s), None)).collect();
        let mut sell = buy.clone();

        for doc in &docs {
            let Some(wanted) = self.match_document(doc, symbols) else {
                continue;
            };
            let Some(series) = &doc.series else {
                continue;
            };
            let prices = series
                .get(&key)
                .map(|bar| (bar.buy_price(), bar.sell_price()));
            let (buy_price, sell_price) = match prices {
                Some((Ok(b), Ok(s))) => (b, s),
                Some(_) => {
                    debug!(symbol = %doc.symbol, at = %key, "unusable bar");
                    (None, None)
                }
                None => (None, None),
            };
            buy.insert(price_key(wanted), buy_price);
            sell.insert(price_key(wanted), sell_price);
        }
        Ok((buy, sell))
    }

    /// Symbol to display name, for documents that carry one.
    pub fn stock_names(&self) -> Result<BTreeMap<String, String>, AgentLedgerError> {
        Ok(load_store(self.store)?
            .unwrap_or_default()
            .iter()
            .filter(|doc| !doc.symbol.is_empty())
            .filter_map(|doc| doc.name().map(|name| (doc.symbol.clone(), name.to_string())))
            .collect())
    }

    /// CN market only: rewrite `SYM_price` keys as `SYM (Name)_price`.
    pub fn format_with_names(&self, prices: &PriceMap) -> Result<PriceMap, AgentLedgerError> {
        if self.market != Market::Cn {
            return Ok(prices.clone());
        }
        let names = self.stock_names()?;
        if names.is_empty() {
            return Ok(prices.clone());
        }
        Ok(prices
            .iter()
            .map(|(key, value)| {
                let renamed = key
                    .strip_suffix(PRICE_SUFFIX)
                    .and_then(|symbol| names.get(symbol).map(|name| (symbol, name)))
                    .map(|(symbol, name)| format!("{symbol} ({name}){PRICE_SUFFIX}"));
                (renamed.unwrap_or_else(|| key.clone()), *value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticStore(Vec<MarketDocument>);

    impl MarketDataPort for StaticStore {
        fn load_documents(&self) -> Result<Vec<MarketDocument>, AgentLedgerError> {
            Ok(self.0.clone())
        }
    }

    fn doc(value: serde_json::Value) -> MarketDocument {
        MarketDocument::from_value(&value).unwrap()
    }

    fn store() -> StaticStore {
        StaticStore(vec![
            doc(json!({
                "Meta Data": {"2. Symbol": "AAA", "2.1. Name": "Alpha"},
                "Time Series (Daily)": {
                    "2024-01-02": {"1. buy price": "10.0", "4. sell price": "12.0"},
                    "2024-01-03": {"1. buy price": "1,012.5", "4. sell price": "11.0"},
                }
            })),
            doc(json!({
                "Meta Data": {"2. Symbol": "BBB"},
                "Time Series (Daily)": {
                    "2024-01-02": {"1. buy price": "oops", "4. sell price": "5.0"},
                }
            })),
        ])
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn price_key_format() {
        assert_eq!(price_key("AAPL"), "AAPL_price");
    }

    #[test]
    fn exact_price_lookup() {
        let store = store();
        let resolver = PriceResolver::new(&store, Market::Us);
        let prices = resolver
            .get_price_at("2024-01-03", &symbols(&["AAA", "BBB", "ZZZ"]))
            .unwrap();
        assert_eq!(prices["AAA_price"], Some(1012.5));
        assert_eq!(prices["BBB_price"], None);
        assert!(!prices.contains_key("ZZZ_price"));
    }

    #[test]
    fn unparsable_price_is_none() {
        let store = store();
        let resolver = PriceResolver::new(&store, Market::Us);
        let prices = resolver.get_price_at("2024-01-02", &symbols(&["BBB"])).unwrap();
        assert_eq!(prices["BBB_price"], None);
    }

    #[test]
    fn previous_prices_cover_every_symbol() {
        let store = store();
        let resolver = PriceResolver::new(&store, Market::Us);
        let (buy, sell) = resolver
            .get_prev_prices("2024-01-03", &symbols(&["AAA", "BBB", "ZZZ"]))
            .unwrap();
        assert_eq!(buy["AAA_price"], Some(10.0));
        assert_eq!(sell["AAA_price"], Some(12.0));
        assert_eq!(buy["BBB_price"], None);
        assert_eq!(sell["BBB_price"], None);
        assert_eq!(buy["ZZZ_price"], None);
        assert_eq!(sell.len(), 3);
    }

    #[test]
    fn names_only_rewrite_cn_keys() {
        let store = store();
        let prices: PriceMap = [("AAA_price".to_string(), Some(1.0)), ("BBB_price".to_string(), None)]
            .into_iter()
            .collect();

        let us = PriceResolver::new(&store, Market::Us);
        assert_eq!(us.format_with_names(&prices).unwrap(), prices);

        let cn = PriceResolver::new(&store, Market::Cn);
        let named = cn.format_with_names(&prices).unwrap();
        assert_eq!(named["AAA (Alpha)_price"], Some(1.0));
        assert_eq!(named["BBB_price"], None);
    }
}

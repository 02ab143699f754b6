//! Instrument universes per market and parsing of symbol lists.

use crate::domain::instrument::{Market, match_instrument};

pub const NASDAQ_100: &[&str] = &[
    "NVDA", "MSFT", "AAPL", "GOOG", "GOOGL", "AMZN", "META", "AVGO", "TSLA", "NFLX", "PLTR",
    "COST", "ASML", "AMD", "CSCO", "AZN", "TMUS", "MU", "LIN", "PEP", "SHOP", "APP", "INTU",
    "AMAT", "LRCX", "PDD", "QCOM", "ARM", "INTC", "BKNG", "AMGN", "TXN", "ISRG", "GILD", "KLAC",
    "PANW", "ADBE", "HON", "CRWD", "CEG", "ADI", "ADP", "DASH", "CMCSA", "VRTX", "MELI", "SBUX",
    "CDNS", "ORLY", "SNPS", "MSTR", "MDLZ", "ABNB", "MRVL", "CTAS", "TRI", "MAR", "MNST", "CSX",
    "ADSK", "PYPL", "FTNT", "AEP", "WDAY", "REGN", "ROP", "NXPI", "DDOG", "AXON", "ROST", "IDXX",
    "EA", "PCAR", "FAST", "EXC", "TTWO", "XEL", "ZS", "PAYX", "WBD", "BKR", "CPRT", "CCEP", "FANG",
    "TEAM", "CHTR", "KDP", "MCHP", "GEHC", "VRSK", "CTSH", "CSGP", "KHC", "ODFL", "DXCM", "TTD",
    "ON", "BIIB", "LULU", "CDW", "GFS",
];

pub const NIFTY_50: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "ICICIBANK", "BHARTIARTL", "INFY", "ITC", "SBIN", "LICI",
    "HINDUNILVR", "LT", "HCLTECH", "BAJFINANCE", "SUNPHARMA", "MARUTI", "ADANIENT", "KOTAKBANK",
    "TITAN", "ULTRACEMCO", "AXISBANK", "NTPC", "ADANIPORTS", "ASIANPAINT", "ONGC", "POWERGRID",
    "COALINDIA", "TATASTEEL", "M&M", "JIOFIN", "HAL", "JSWSTEEL", "TATAMOTORS", "APOLLOHOSP",
    "BAJAJ-AUTO", "BAJAJFINSV", "BPCL", "CIPLA", "DIVISLAB", "DRREDDY", "EICHERMOT", "GRASIM",
    "HEROMOTOCO", "INDUSINDBK", "LTIM", "NESTLEIND", "SHREECEM", "TECHM", "WIPRO", "HINDALCO",
    "BRITANNIA",
];

pub const SSE_50: &[&str] = &[
    "600519.SH", "601318.SH", "600036.SH", "601899.SH", "600900.SH", "601166.SH", "600276.SH",
    "600030.SH", "603259.SH", "688981.SH", "688256.SH", "601398.SH", "688041.SH", "601211.SH",
    "601288.SH", "601328.SH", "688008.SH", "600887.SH", "600150.SH", "601816.SH", "601127.SH",
    "600031.SH", "688012.SH", "603501.SH", "601088.SH", "600309.SH", "601601.SH", "601668.SH",
    "603993.SH", "601012.SH", "601728.SH", "600690.SH", "600809.SH", "600941.SH", "600406.SH",
    "601857.SH", "601766.SH", "601919.SH", "600050.SH", "600760.SH", "601225.SH", "600028.SH",
    "601988.SH", "688111.SH", "601985.SH", "601888.SH", "601628.SH", "601600.SH", "601658.SH",
    "600048.SH",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub symbols: Vec<String>,
    pub market: Market,
}

impl Universe {
    /// The index constituents the agent trades by default in `market`.
    pub fn default_for(market: Market) -> Self {
        let list = match market {
            Market::Us => NASDAQ_100,
            Market::In => NIFTY_50,
            Market::Cn => SSE_50,
        };
        Self {
            symbols: list.iter().map(|s| s.to_string()).collect(),
            market,
        }
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    /// Whether `symbol` names one of this universe's instruments, ignoring
    /// the exchange suffix where the market does.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|member| {
            match_instrument(symbol, member, self.market)
                || match_instrument(member, symbol, self.market)
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("{symbol} is not in the {market} universe")]
    UnknownSymbol { symbol: String, market: Market },
}

/// Comma-separated symbols, trimmed and upper-cased, restricted to the
/// default universe of `market`. `INFY` and `INFY.BSE` count as the same
/// instrument in suffix-agnostic markets.
pub fn parse_codes(input: &str, market: Market) -> Result<Universe, UniverseError> {
    let universe = Universe::default_for(market);
    let mut picked = Universe {
        symbols: Vec::new(),
        market,
    };

    for token in input.split(',').map(str::trim) {
        if token.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = token.to_uppercase();
        if !universe.contains(&symbol) {
            return Err(UniverseError::UnknownSymbol { symbol, market });
        }
        if picked.contains(&symbol) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        picked.symbols.push(symbol);
    }

    Ok(picked)
}

//! Static configuration shared by the loader, pipeline and dashboard.

use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// First day of every historical request.
pub const START_DATE_STR: &str = "2015-01-01";

/// Equity tickers offered by the stock pipeline.
pub const EQUITY_TICKERS: &[&str] = &["AAPL", "GOOG", "MSFT", "GME", "AMC", "OCGN"];

/// Cryptocurrency tickers offered by the crypto pipeline.
pub const CRYPTO_TICKERS: &[&str] = &["BTC-USD", "ETH-USD", "BNB-USD", "ADA-USD"];

/// Rows shown by the raw data and forecast tables.
pub const DEFAULT_TAIL_ROWS: usize = 5;

/// Allowed horizon selection, in the preset's unit.
pub const HORIZON_RANGE: RangeInclusive<u32> = 1..=4;

pub struct YahooConfig {
    pub base_url: &'static str,
    pub user_agent: &'static str,
    pub interval: &'static str,
}

pub const YAHOO: YahooConfig = YahooConfig {
    base_url: "https://query1.finance.yahoo.com",
    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    interval: "1d",
};

/// Parsed [`START_DATE_STR`].
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN)
}

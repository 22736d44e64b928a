//! Yahoo Finance chart API source
//!
//! Fetches daily OHLCV history from the public `v8/finance/chart` endpoint
//! with a blocking HTTP client.

use crate::config::YAHOO;
use crate::data::{MarketDataSource, PriceBar};
use crate::error::{ForecastError, Result};
use crate::utils::{date_from_days, days_since_epoch};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance market data source
#[derive(Debug, Clone)]
pub struct YahooFinanceSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooFinanceSource {
    /// Create a source against the public Yahoo endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(YAHOO.base_url)
    }

    /// Create a source against another host (e.g. a local mirror)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(YAHOO.user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the chart URL. `period2` is exclusive upstream, so it points at
    /// the day after `end`.
    fn build_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = days_since_epoch(start) * 86_400;
        let period2 = (days_since_epoch(end) + 1) * 86_400;
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}&events=div%2Csplits",
            self.base_url, ticker, period1, period2, YAHOO.interval
        )
    }

    /// Parse a chart response body into bars
    fn parse_response(json: &str) -> Result<Vec<PriceBar>> {
        let response: ChartResponse = serde_json::from_str(json)?;

        if let Some(error) = response.chart.error {
            return Err(ForecastError::DataUnavailable(format!(
                "[{}] {}",
                error.code, error.description
            )));
        }

        let results = response.chart.result.unwrap_or_default();
        let data = results
            .first()
            .ok_or_else(|| ForecastError::DataUnavailable("Empty chart result".to_string()))?;

        let timestamps = match &data.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => {
                return Err(ForecastError::DataUnavailable(
                    "Chart result has no timestamps".to_string(),
                ))
            }
        };
        let quote = data
            .indicators
            .quote
            .first()
            .ok_or_else(|| {
                ForecastError::DataUnavailable("Chart result has no quotes".to_string())
            })?;
        let adj = data.indicators.adjclose.as_ref().and_then(|a| a.first());
        let offset = data.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (i, ts) in timestamps.iter().enumerate() {
            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();

            // exchange-local calendar day of the bar
            let date = date_from_days((ts + offset).div_euclid(86_400));

            match (date, open, high, low, close) {
                (Some(date), Some(open), Some(high), Some(low), Some(close)) => {
                    let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
                    let adj_close = adj
                        .and_then(|a| a.adjclose.get(i).copied().flatten())
                        .unwrap_or(close);
                    bars.push(PriceBar {
                        date,
                        open,
                        high,
                        low,
                        close,
                        adj_close,
                        volume: volume.max(0.0) as u64,
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} incomplete rows in chart response", skipped);
        }

        Ok(bars)
    }
}

impl MarketDataSource for YahooFinanceSource {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        let url = self.build_url(ticker, start, end);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        match Self::parse_response(&body) {
            Ok(bars) => Ok(bars),
            Err(ForecastError::ParseError(e)) if !status.is_success() => Err(
                ForecastError::DataUnavailable(format!("HTTP {} for {}: {}", status, ticker, e)),
            ),
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

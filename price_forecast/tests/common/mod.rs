//! Offline market data sources shared by the integration tests

#![allow(dead_code)]

use chrono::{Datelike, Days, NaiveDate, Weekday};
use price_forecast::error::{ForecastError, Result};
use price_forecast::{MarketDataSource, PriceBar};
use std::cell::Cell;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Deterministic daily bars: a drifting sine wave, weekdays only for equities
#[derive(Debug, Default)]
pub struct SyntheticSource {
    calls: Cell<usize>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn trades_on(ticker: &str, date: NaiveDate) -> bool {
        ticker.ends_with("-USD") || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl MarketDataSource for SyntheticSource {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        self.calls.set(self.calls.get() + 1);

        let base = 50.0 + ticker.len() as f64 * 10.0;
        let mut bars = Vec::new();
        let mut day = start;
        let mut i = 0.0;
        while day <= end {
            if Self::trades_on(ticker, day) {
                let close = base + 0.02 * i + 3.0 * (i * std::f64::consts::TAU / 30.0).sin();
                bars.push(PriceBar {
                    date: day,
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    adj_close: close,
                    volume: 1_000 + i as u64,
                });
            }
            day = day.checked_add_days(Days::new(1)).unwrap();
            i += 1.0;
        }
        Ok(bars)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Always fails, like an unreachable provider
#[derive(Debug, Default)]
pub struct FailingSource;

impl MarketDataSource for FailingSource {
    fn fetch(&self, ticker: &str, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<PriceBar>> {
        Err(ForecastError::ParseError(format!("no quotes for {}", ticker)))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

//! Daily price series and the loader that fetches them

use crate::cache::SeriesCache;
use crate::error::{ForecastError, Result};
use crate::utils::{dates_to_series, series_to_dates};
use chrono::{NaiveDate, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub mod csv_source;
pub mod yahoo;

pub use csv_source::CsvDirectorySource;
pub use yahoo::YahooFinanceSource;

/// Column names of a [`PriceSeries`] frame
pub mod columns {
    pub const DATE: &str = "Date";
    pub const OPEN: &str = "Open";
    pub const HIGH: &str = "High";
    pub const LOW: &str = "Low";
    pub const CLOSE: &str = "Close";
    pub const ADJ_CLOSE: &str = "Adj Close";
    pub const VOLUME: &str = "Volume";
}

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// Daily price series of a single ticker, date kept as a plain column
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    df: DataFrame,
}

impl PriceSeries {
    /// Build a series from bars, sorted chronologically
    pub fn from_bars(ticker: &str, mut bars: Vec<PriceBar>) -> Result<Self> {
        bars.sort_by_key(|b| b.date);

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let df = DataFrame::new(vec![
            dates_to_series(columns::DATE, &dates)?,
            Series::new(columns::OPEN, bars.iter().map(|b| b.open).collect::<Vec<f64>>()),
            Series::new(columns::HIGH, bars.iter().map(|b| b.high).collect::<Vec<f64>>()),
            Series::new(columns::LOW, bars.iter().map(|b| b.low).collect::<Vec<f64>>()),
            Series::new(columns::CLOSE, bars.iter().map(|b| b.close).collect::<Vec<f64>>()),
            Series::new(
                columns::ADJ_CLOSE,
                bars.iter().map(|b| b.adj_close).collect::<Vec<f64>>(),
            ),
            Series::new(columns::VOLUME, bars.iter().map(|b| b.volume).collect::<Vec<u64>>()),
        ])?;

        Ok(Self {
            ticker: ticker.to_string(),
            df,
        })
    }

    /// Ticker symbol
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Get the dates as a vector
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        series_to_dates(self.df.column(columns::DATE)?)
    }

    /// Get the open prices as a vector
    pub fn opens(&self) -> Result<Vec<f64>> {
        self.column_as_f64(columns::OPEN)
    }

    /// Get the close prices as a vector
    pub fn closes(&self) -> Result<Vec<f64>> {
        self.column_as_f64(columns::CLOSE)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates().ok().and_then(|d| d.first().copied())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates().ok().and_then(|d| d.last().copied())
    }

    /// Rebuild the rows as bars
    pub fn bars(&self) -> Result<Vec<PriceBar>> {
        let dates = self.dates()?;
        let opens = self.opens()?;
        let highs = self.column_as_f64(columns::HIGH)?;
        let lows = self.column_as_f64(columns::LOW)?;
        let closes = self.closes()?;
        let adj = self.column_as_f64(columns::ADJ_CLOSE)?;
        let volumes = self.column_as_u64(columns::VOLUME)?;

        Ok((0..dates.len())
            .map(|i| PriceBar {
                date: dates[i],
                open: opens[i],
                high: highs[i],
                low: lows[i],
                close: closes[i],
                adj_close: adj[i],
                volume: volumes[i],
            })
            .collect())
    }

    /// Last `n` rows as bars
    pub fn tail(&self, n: usize) -> Result<Vec<PriceBar>> {
        let start = self.len().saturating_sub(n);
        self.slice(start, None)?.bars()
    }

    /// Get a slice of the data from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Result<Self> {
        let end = end.unwrap_or(self.df.height()).min(self.df.height());
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "Slice start ({}) is after end ({})",
                start, end
            )));
        }

        Ok(PriceSeries {
            ticker: self.ticker.clone(),
            df: self.df.slice(start as i64, end - start),
        })
    }

    /// Rows dated within `start..=end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let dates = self.dates()?;
        let from = dates.partition_point(|d| *d < start);
        let to = dates.partition_point(|d| *d <= end).max(from);
        self.slice(from, Some(to))
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(&self, column_name: &str) -> Result<Vec<f64>> {
        let col = self.df.column(column_name).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
        })?;
        let values = col.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Ok(values)
    }

    /// Helper method to get a column as u64 values
    fn column_as_u64(&self, column_name: &str) -> Result<Vec<u64>> {
        let col = self.df.column(column_name).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
        })?;
        let values = col.cast(&DataType::UInt64)?;
        let values = values.u64()?.into_iter().map(|v| v.unwrap_or(0)).collect();
        Ok(values)
    }
}

/// A remote or local provider of daily bars
pub trait MarketDataSource {
    /// Fetch daily bars for `ticker` between `start` and `end` (inclusive)
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>>;

    /// Human readable source name
    fn name(&self) -> &str;
}

impl<S: MarketDataSource + ?Sized> MarketDataSource for Box<S> {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        (**self).fetch(ticker, start, end)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Data loader for daily price series, memoised per ticker
#[derive(Debug)]
pub struct DataLoader<S> {
    source: S,
    cache: SeriesCache,
}

impl<S: MarketDataSource> DataLoader<S> {
    /// Create a loader over `source` using an injected cache
    pub fn new(source: S, cache: SeriesCache) -> Self {
        Self { source, cache }
    }

    /// Load the series for `ticker` from `start` to `end`.
    ///
    /// A cached series is clipped to the range without a new fetch. Cache
    /// entries never expire on their own, so a new trading day only shows
    /// up after the entry is invalidated.
    pub fn load(&mut self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        if ticker.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Ticker must not be empty".to_string(),
            ));
        }
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }

        if let Some(entry) = self.cache.lookup(ticker) {
            log::debug!(
                "Cache hit for {} (fetched at {})",
                ticker,
                entry.fetched_at.format("%Y-%m-%d %H:%M:%S")
            );
            let series = entry.series.between(start, end)?;
            if series.is_empty() {
                return Err(ForecastError::DataUnavailable(format!(
                    "No cached data for {} between {} and {}",
                    ticker, start, end
                )));
            }
            return Ok(series);
        }

        log::info!(
            "Fetching {} from {} ({} to {})",
            ticker,
            self.source.name(),
            start,
            end
        );
        let mut bars = self
            .source
            .fetch(ticker, start, end)
            .map_err(|e| match e {
                ForecastError::DataUnavailable(_) => e,
                other => ForecastError::DataUnavailable(format!("{}: {}", ticker, other)),
            })?;

        let before = bars.len();
        bars.retain(|b| b.date >= start && b.date <= end);
        if bars.len() < before {
            log::debug!(
                "Dropped {} bars of {} outside {}..={}",
                before - bars.len(),
                ticker,
                start,
                end
            );
        }

        if bars.is_empty() {
            return Err(ForecastError::DataUnavailable(format!(
                "No data returned for {} between {} and {}",
                ticker, start, end
            )));
        }

        let series = PriceSeries::from_bars(ticker, bars)?;
        log::info!("Loaded {} rows for {}", series.len(), ticker);
        self.cache.insert(ticker, series.clone(), Utc::now());

        Ok(series)
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut SeriesCache {
        &mut self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

//! Offline source reading `<dir>/<TICKER>.csv` files

use crate::data::{MarketDataSource, PriceBar};
use crate::error::{ForecastError, Result};
use crate::utils::series_to_dates;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Columns detected in a price CSV
#[derive(Debug, Clone, PartialEq)]
struct DetectedColumns {
    time: String,
    open: Option<String>,
    high: Option<String>,
    low: Option<String>,
    close: String,
    adj_close: Option<String>,
    volume: Option<String>,
}

/// Directory of per-ticker CSV exports
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing `ticker`
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

impl MarketDataSource for CsvDirectorySource {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(ForecastError::DataUnavailable(format!(
                "No CSV file for {} at {}",
                ticker,
                path.display()
            )));
        }

        let bars = read_price_csv(&path)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect())
    }

    fn name(&self) -> &str {
        "CSV directory"
    }
}

/// Load daily bars from a CSV file with a header row
pub fn read_price_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceBar>> {
    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;

    bars_from_dataframe(&df)
}

/// Convert a loosely named OHLCV frame into bars; rows without a close are skipped
pub fn bars_from_dataframe(df: &DataFrame) -> Result<Vec<PriceBar>> {
    let detected = detect_columns(df)?;

    let dates = series_to_dates(df.column(&detected.time)?)?;
    let closes = optional_f64(df, &detected.close)?;
    let opens = match &detected.open {
        Some(name) => optional_f64(df, name)?,
        None => closes.clone(),
    };
    let highs = match &detected.high {
        Some(name) => optional_f64(df, name)?,
        None => closes.clone(),
    };
    let lows = match &detected.low {
        Some(name) => optional_f64(df, name)?,
        None => closes.clone(),
    };
    let adj = match &detected.adj_close {
        Some(name) => optional_f64(df, name)?,
        None => closes.clone(),
    };
    let volumes = match &detected.volume {
        Some(name) => optional_f64(df, name)?,
        None => vec![None; dates.len()],
    };

    let mut bars = Vec::with_capacity(dates.len());
    let mut skipped = 0usize;
    for i in 0..dates.len() {
        let Some(close) = closes[i] else {
            skipped += 1;
            continue;
        };
        bars.push(PriceBar {
            date: dates[i],
            open: opens[i].unwrap_or(close),
            high: highs[i].unwrap_or(close),
            low: lows[i].unwrap_or(close),
            close,
            adj_close: adj[i].unwrap_or(close),
            volume: volumes[i].unwrap_or(0.0).max(0.0) as u64,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {} CSV rows without a close price", skipped);
    }

    Ok(bars)
}

fn optional_f64(df: &DataFrame, column_name: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(column_name)?;
    let values = col.cast(&DataType::Float64).map_err(|e| {
        ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64: {}",
            column_name, e
        ))
    })?;
    let values = values.f64()?.into_iter().collect();
    Ok(values)
}

fn find_column(names: &[&str], predicate: impl Fn(&str) -> bool) -> Option<String> {
    names
        .iter()
        .find(|name| predicate(name.to_lowercase().as_str()))
        .map(|name| name.to_string())
}

fn detect_columns(df: &DataFrame) -> Result<DetectedColumns> {
    let names = df.get_column_names();

    // Look for common time column names
    let time = find_column(&names, |n| {
        n.contains("date") || n.contains("time") || n == "ds"
    })
    .or_else(|| {
        df.get_columns()
            .first()
            .filter(|c| c.dtype().is_temporal())
            .map(|c| c.name().to_string())
    })
    .ok_or_else(|| ForecastError::DataError("No time column found in data".to_string()))?;

    let adj_close = find_column(&names, |n| n.contains("adj"));
    let close = find_column(&names, |n| n.contains("close") && !n.contains("adj"))
        .or_else(|| find_column(&names, |n| n.contains("price")))
        .or_else(|| adj_close.clone())
        .ok_or_else(|| {
            ForecastError::DataError("No close price column found in data".to_string())
        })?;

    Ok(DetectedColumns {
        time,
        open: find_column(&names, |n| n.contains("open")),
        high: find_column(&names, |n| n.contains("high")),
        low: find_column(&names, |n| n.contains("low")),
        close,
        adj_close,
        volume: find_column(&names, |n| n.contains("volume") || n == "vol"),
    })
}

//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

/// Days since 1970-01-01
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Inverse of [`days_since_epoch`]
pub fn date_from_days(days: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::default();
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Build a polars `Date` series
pub fn dates_to_series(name: &str, dates: &[NaiveDate]) -> Result<Series> {
    let days: Vec<i32> = dates.iter().map(|d| days_since_epoch(*d) as i32).collect();
    Ok(Series::new(name, days).cast(&DataType::Date)?)
}

/// Read a `Date` (or date-like string) series back into chrono dates
pub fn series_to_dates(series: &Series) -> Result<Vec<NaiveDate>> {
    match series.dtype() {
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .map(|v| {
                let raw = v.ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Null value in date column '{}'",
                        series.name()
                    ))
                })?;
                parse_date(raw)
            })
            .collect(),
        DataType::Datetime(_, _) => series_to_dates(&series.cast(&DataType::Date)?),
        _ => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|v| {
                    v.and_then(|d| date_from_days(d as i64)).ok_or_else(|| {
                        ForecastError::DataError(format!(
                            "Invalid value in date column '{}'",
                            series.name()
                        ))
                    })
                })
                .collect()
        }
    }
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time part
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    Ok(NaiveDate::parse_from_str(date_part, "%Y-%m-%d")?)
}

/// Consecutive daily dates following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64)
        .filter_map(|d| last.checked_add_days(Days::new(d)))
        .collect()
}

/// Calculate accuracy metrics for a fit vs observed values; missing
/// observations are skipped
pub fn forecast_accuracy(fitted: &[f64], actual: &[Option<f64>]) -> Result<ForecastAccuracy> {
    if fitted.len() != actual.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "Fitted length ({}) doesn't match actual length ({})",
            fitted.len(),
            actual.len()
        )));
    }

    let pairs: Vec<(f64, f64)> = fitted
        .iter()
        .zip(actual.iter())
        .filter_map(|(&f, a)| a.filter(|v| v.is_finite()).map(|a| (f, a)))
        .collect();

    if pairs.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "No observed values to compare against".to_string(),
        ));
    }

    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(f, a)| (a - f).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(f, a)| (a - f).powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mape = pairs
        .iter()
        .filter(|(_, a)| *a != 0.0)
        .map(|(f, a)| ((a - f).abs() / a.abs()) * 100.0)
        .sum::<f64>()
        / n;

    let smape = pairs
        .iter()
        .map(|(f, a)| {
            let denom = a.abs() + f.abs();
            if denom == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / denom
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.4}, RMSE {:.4}, MAPE {:.2}%, SMAPE {:.2}%",
            self.mae, self.rmse, self.mape, self.smape
        )
    }
}

//! Forecasting models for daily price series

use crate::error::{ForecastError, Result};
use crate::preprocess::TrainingFrame;
use crate::utils::dates_to_series;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

pub mod config;
pub mod decomposition;

pub use config::{CustomSeasonality, ModelConfig, SeasonalityMode, SeasonalityToggle};
pub use decomposition::{DecompositionModel, TrainedDecompositionModel};

/// One row of a forecast table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
    pub components: BTreeMap<String, f64>,
}

/// Forecast over an ordered date range with bounds and components
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub(crate) dates: Vec<NaiveDate>,
    /// Point forecasts
    pub(crate) values: Vec<f64>,
    /// (lower, upper) uncertainty bounds
    pub(crate) intervals: Vec<(f64, f64)>,
    pub(crate) trend: Vec<f64>,
    pub(crate) trend_intervals: Vec<(f64, f64)>,
    /// Seasonal and holiday components by name
    pub(crate) components: BTreeMap<String, Vec<f64>>,
    pub(crate) additive_terms: Vec<f64>,
    pub(crate) multiplicative_terms: Vec<f64>,
    /// Rows on or before the last training date
    pub(crate) history_len: usize,
}

impl ForecastResult {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the uncertainty intervals
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    pub fn lower(&self) -> Vec<f64> {
        self.intervals.iter().map(|(l, _)| *l).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.intervals.iter().map(|(_, u)| *u).collect()
    }

    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    pub fn trend_intervals(&self) -> &[(f64, f64)] {
        &self.trend_intervals
    }

    /// A seasonal or holiday component by name
    pub fn component(&self, name: &str) -> Option<&[f64]> {
        self.components.get(name).map(|v| v.as_slice())
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.keys().map(|k| k.as_str()).collect()
    }

    pub fn additive_terms(&self) -> &[f64] {
        &self.additive_terms
    }

    pub fn multiplicative_terms(&self) -> &[f64] {
        &self.multiplicative_terms
    }

    /// Number of rows covering the training history
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Number of periods forecasted past the history
    pub fn horizons(&self) -> usize {
        self.dates.len() - self.history_len
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Row `i` of the forecast table
    pub fn row(&self, i: usize) -> Option<ForecastRow> {
        let ds = *self.dates.get(i)?;
        let (yhat_lower, yhat_upper) = self.intervals[i];
        Some(ForecastRow {
            ds,
            yhat: self.values[i],
            yhat_lower,
            yhat_upper,
            trend: self.trend[i],
            components: self
                .components
                .iter()
                .map(|(name, values)| (name.clone(), values[i]))
                .collect(),
        })
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Vec<ForecastRow> {
        let start = self.len().saturating_sub(n);
        (start..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Tabular form with one column per output field
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![
            dates_to_series("ds", &self.dates)?,
            Series::new("trend", self.trend.clone()),
            Series::new("yhat_lower", self.lower()),
            Series::new("yhat_upper", self.upper()),
            Series::new(
                "trend_lower",
                self.trend_intervals.iter().map(|(l, _)| *l).collect::<Vec<f64>>(),
            ),
            Series::new(
                "trend_upper",
                self.trend_intervals.iter().map(|(_, u)| *u).collect::<Vec<f64>>(),
            ),
        ];
        for (name, values) in &self.components {
            columns.push(Series::new(name.as_str(), values.clone()));
        }
        columns.push(Series::new("additive_terms", self.additive_terms.clone()));
        columns.push(Series::new(
            "multiplicative_terms",
            self.multiplicative_terms.clone(),
        ));
        columns.push(Series::new("yhat", self.values.clone()));

        Ok(DataFrame::new(columns)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Training dates followed by `horizon` consecutive future days
    fn make_future_dates(&self, horizon: usize) -> Vec<NaiveDate>;

    /// Predict every date in `dates`
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a training frame
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a (ds, y) frame
    fn train(&self, data: &TrainingFrame) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Fit a decomposition model and predict the history plus `horizon_days`
pub fn fit_and_forecast(
    frame: &TrainingFrame,
    horizon_days: usize,
    config: &ModelConfig,
) -> Result<(TrainedDecompositionModel, ForecastResult)> {
    let model = DecompositionModel::new(config.clone())?;
    let trained = model.train(frame)?;
    let dates = trained.make_future_dates(horizon_days);
    let forecast = trained.predict(&dates)?;

    if forecast.horizons() != horizon_days {
        return Err(ForecastError::DataError(format!(
            "Expected {} future rows, produced {}",
            horizon_days,
            forecast.horizons()
        )));
    }

    Ok((trained, forecast))
}

/// Fit on `frame` and forecast `horizon_days` past its last date
pub fn forecast(
    frame: &TrainingFrame,
    horizon_days: usize,
    config: &ModelConfig,
) -> Result<ForecastResult> {
    fit_and_forecast(frame, horizon_days, config).map(|(_, f)| f)
}

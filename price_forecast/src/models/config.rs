//! Configuration of the decomposition model

use crate::error::{ForecastError, Result};
use crate::holidays::calendar_for;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Names the model reserves for its own components
const RESERVED_NAMES: &[&str] = &[
    "ds",
    "trend",
    "trend_lower",
    "trend_upper",
    "weekly",
    "yearly",
    "holidays",
    "additive_terms",
    "multiplicative_terms",
    "yhat",
    "yhat_lower",
    "yhat_upper",
];

/// How seasonal and holiday effects combine with the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// `y = trend + seasonal`
    #[default]
    Additive,
    /// `y = trend * (1 + seasonal)`
    Multiplicative,
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalityMode::Additive => write!(f, "additive"),
            SeasonalityMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for SeasonalityMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Ok(SeasonalityMode::Additive),
            "multiplicative" => Ok(SeasonalityMode::Multiplicative),
            other => Err(ForecastError::ConfigurationError(format!(
                "Unknown seasonality mode '{}'",
                other
            ))),
        }
    }
}

/// Whether a built-in seasonality is fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityToggle {
    /// Decided from the length of the history
    #[default]
    Auto,
    Enabled,
    Disabled,
}

/// User defined periodic component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSeasonality {
    pub name: String,
    pub period_days: f64,
    pub fourier_order: usize,
}

/// Model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub seasonality_mode: SeasonalityMode,
    pub yearly_seasonality: SeasonalityToggle,
    pub weekly_seasonality: SeasonalityToggle,
    pub custom_seasonalities: Vec<CustomSeasonality>,
    /// Country code of the holiday calendar, e.g. `"US"`
    pub holidays_country: Option<String>,
    pub n_changepoints: usize,
    /// Share of the history in which changepoints are placed
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub holidays_prior_scale: f64,
    /// Coverage of the uncertainty interval
    pub interval_width: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seasonality_mode: SeasonalityMode::Additive,
            yearly_seasonality: SeasonalityToggle::Auto,
            weekly_seasonality: SeasonalityToggle::Auto,
            custom_seasonalities: Vec::new(),
            holidays_country: None,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            holidays_prior_scale: 10.0,
            interval_width: 0.80,
        }
    }
}

impl ModelConfig {
    pub fn with_seasonality_mode(mut self, mode: SeasonalityMode) -> Self {
        self.seasonality_mode = mode;
        self
    }

    /// Add a custom seasonality; checked by [`ModelConfig::validate`]
    pub fn add_seasonality(mut self, name: &str, period_days: f64, fourier_order: usize) -> Self {
        self.custom_seasonalities.push(CustomSeasonality {
            name: name.to_string(),
            period_days,
            fourier_order,
        });
        self
    }

    pub fn with_country_holidays(mut self, country: &str) -> Self {
        self.holidays_country = Some(country.to_string());
        self
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| ForecastError::ConfigurationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed settings before any fitting happens
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for s in &self.custom_seasonalities {
            let name = s.name.trim();
            if name.is_empty() {
                return Err(ForecastError::ConfigurationError(
                    "Seasonality name must not be empty".to_string(),
                ));
            }
            if RESERVED_NAMES.contains(&name) {
                return Err(ForecastError::ConfigurationError(format!(
                    "Seasonality name '{}' is reserved",
                    name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(ForecastError::ConfigurationError(format!(
                    "Seasonality '{}' is defined twice",
                    name
                )));
            }
            if !s.period_days.is_finite() || s.period_days <= 0.0 {
                return Err(ForecastError::ConfigurationError(format!(
                    "Seasonality '{}' needs a positive period, got {}",
                    name, s.period_days
                )));
            }
            if s.fourier_order == 0 {
                return Err(ForecastError::ConfigurationError(format!(
                    "Seasonality '{}' needs a Fourier order of at least 1",
                    name
                )));
            }
        }

        if let Some(country) = &self.holidays_country {
            calendar_for(country)?;
        }

        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::ConfigurationError(format!(
                "Interval width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::ConfigurationError(format!(
                "Changepoint range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        for (label, scale) in [
            ("changepoint", self.changepoint_prior_scale),
            ("seasonality", self.seasonality_prior_scale),
            ("holidays", self.holidays_prior_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ForecastError::ConfigurationError(format!(
                    "The {} prior scale must be positive, got {}",
                    label, scale
                )));
            }
        }

        Ok(())
    }
}

//! Selection driven pipeline shared by the equity and crypto views
//!
//! A [`SelectionChanged`] event runs load, preprocess, fit and forecast for
//! one ticker and returns everything the presentation layer renders.

use crate::cache::SeriesCache;
use crate::config::{start_date, CRYPTO_TICKERS, EQUITY_TICKERS, HORIZON_RANGE};
use crate::data::{DataLoader, MarketDataSource, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::models::config::{ModelConfig, SeasonalityMode};
use crate::models::decomposition::TrainedDecompositionModel;
use crate::models::{fit_and_forecast, ForecastResult};
use crate::preprocess::{to_training_frame, TrainingFrame};
use crate::utils::{forecast_accuracy, ForecastAccuracy};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// Unit of the horizon slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonUnit {
    Years,
    Weeks,
}

impl HorizonUnit {
    pub fn days_per_unit(&self) -> usize {
        match self {
            HorizonUnit::Years => 365,
            HorizonUnit::Weeks => 7,
        }
    }

    /// Convert a slider value to days, rejecting values outside the slider range
    pub fn to_days(&self, amount: u32) -> Result<usize> {
        if !HORIZON_RANGE.contains(&amount) {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon must be between {} and {} {}, got {}",
                HORIZON_RANGE.start(),
                HORIZON_RANGE.end(),
                self,
                amount
            )));
        }
        Ok(amount as usize * self.days_per_unit())
    }
}

impl fmt::Display for HorizonUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizonUnit::Years => write!(f, "years"),
            HorizonUnit::Weeks => write!(f, "weeks"),
        }
    }
}

/// The two asset classes the application covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    Equities,
    Crypto,
}

impl Market {
    pub const ALL: [Market; 2] = [Market::Equities, Market::Crypto];
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Equities => write!(f, "equities"),
            Market::Crypto => write!(f, "crypto"),
        }
    }
}

impl FromStr for Market {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "equities" | "equity" | "stocks" | "stock" => Ok(Market::Equities),
            "crypto" | "cryptocurrency" => Ok(Market::Crypto),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown market '{}'",
                other
            ))),
        }
    }
}

/// Ticker list, horizon unit and model settings of one view
#[derive(Debug, Clone)]
pub struct PipelinePreset {
    pub market: Market,
    pub title: &'static str,
    pub tickers: &'static [&'static str],
    pub horizon_unit: HorizonUnit,
    pub model_config: ModelConfig,
}

impl PipelinePreset {
    pub fn equities() -> Self {
        Self {
            market: Market::Equities,
            title: "Stock prediction",
            tickers: EQUITY_TICKERS,
            horizon_unit: HorizonUnit::Years,
            model_config: ModelConfig::default(),
        }
    }

    pub fn crypto() -> Self {
        Self {
            market: Market::Crypto,
            title: "Crypto forecaster",
            tickers: CRYPTO_TICKERS,
            horizon_unit: HorizonUnit::Weeks,
            model_config: ModelConfig::default()
                .with_seasonality_mode(SeasonalityMode::Multiplicative)
                .add_seasonality("monthly", 30.5, 5)
                .with_country_holidays("US"),
        }
    }

    pub fn for_market(market: Market) -> Self {
        match market {
            Market::Equities => Self::equities(),
            Market::Crypto => Self::crypto(),
        }
    }

    /// Replace the model settings, validating them first
    pub fn with_model_config(mut self, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        self.model_config = config;
        Ok(self)
    }

    pub fn default_ticker(&self) -> &'static str {
        self.tickers.first().copied().unwrap_or_default()
    }

    pub fn offers(&self, ticker: &str) -> bool {
        self.tickers.contains(&ticker)
    }
}

/// Emitted whenever a view's ticker or horizon changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub market: Market,
    pub ticker: String,
    /// Slider value in the preset's horizon unit
    pub horizon: u32,
}

impl SelectionChanged {
    pub fn new(market: Market, ticker: &str, horizon: u32) -> Self {
        Self {
            market,
            ticker: ticker.to_string(),
            horizon,
        }
    }
}

/// Everything rendered for one selection
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub ticker: String,
    pub horizon_days: usize,
    pub series: PriceSeries,
    pub training: TrainingFrame,
    pub forecast: ForecastResult,
    pub model: TrainedDecompositionModel,
    /// In-sample fit quality, absent when nothing could be compared
    pub accuracy: Option<ForecastAccuracy>,
    pub loaded_from_cache: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Owns the loader and runs the pipeline for selection events
#[derive(Debug)]
pub struct ForecastService<S> {
    loader: DataLoader<S>,
    equities: PipelinePreset,
    crypto: PipelinePreset,
    today: Option<NaiveDate>,
}

impl<S: MarketDataSource> ForecastService<S> {
    pub fn new(source: S) -> Self {
        Self {
            loader: DataLoader::new(source, SeriesCache::new()),
            equities: PipelinePreset::equities(),
            crypto: PipelinePreset::crypto(),
            today: None,
        }
    }

    /// Pin the end date of every request instead of using the local date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Override the preset of its market
    pub fn with_preset(mut self, preset: PipelinePreset) -> Self {
        match preset.market {
            Market::Equities => self.equities = preset,
            Market::Crypto => self.crypto = preset,
        }
        self
    }

    pub fn preset(&self, market: Market) -> &PipelinePreset {
        match market {
            Market::Equities => &self.equities,
            Market::Crypto => &self.crypto,
        }
    }

    pub fn loader(&self) -> &DataLoader<S> {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut DataLoader<S> {
        &mut self.loader
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Run load, preprocess, fit and forecast for one selection
    pub fn handle(&mut self, event: &SelectionChanged) -> Result<PipelineOutput> {
        let preset = self.preset(event.market).clone();
        if !preset.offers(&event.ticker) {
            return Err(ForecastError::InvalidParameter(format!(
                "{} is not offered in the {} view",
                event.ticker, preset.market
            )));
        }
        let horizon_days = preset.horizon_unit.to_days(event.horizon)?;

        let today = self.today();
        let loaded_from_cache = self.loader.cache().contains(&event.ticker);
        let series = self.loader.load(&event.ticker, start_date(), today)?;
        let fetched_at = self
            .loader
            .cache()
            .get(&event.ticker)
            .map(|entry| entry.fetched_at);

        let training = to_training_frame(&series)?;
        let (model, forecast) = fit_and_forecast(&training, horizon_days, &preset.model_config)?;

        let history = forecast.history_len();
        let accuracy = match forecast_accuracy(&forecast.values()[..history], &training.values()?) {
            Ok(accuracy) => {
                log::info!("{} in-sample fit: {}", event.ticker, accuracy);
                Some(accuracy)
            }
            Err(e) => {
                log::warn!("No in-sample accuracy for {}: {}", event.ticker, e);
                None
            }
        };

        log::info!(
            "Forecast {} for {} days through {}",
            event.ticker,
            horizon_days,
            forecast
                .last_date()
                .map(|d| d.to_string())
                .unwrap_or_default()
        );

        Ok(PipelineOutput {
            ticker: event.ticker.clone(),
            horizon_days,
            series,
            training,
            forecast,
            model,
            accuracy,
            loaded_from_cache,
            fetched_at,
        })
    }
}

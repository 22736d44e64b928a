//! # Price Forecast
//!
//! Daily price loading and decomposition forecasting for stocks and
//! cryptocurrencies.
//!
//! ## Features
//!
//! - Daily OHLCV series from the Yahoo Finance chart API or a CSV directory
//! - Per-ticker memoisation of loaded series
//! - Reduction to a two-column (`ds`, `y`) training frame
//! - Decomposition model: piecewise-linear trend, Fourier seasonality and
//!   country holidays, additive or multiplicative
//! - Uncertainty intervals that widen over the forecast horizon
//! - Equity and crypto presets driven by selection events
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::data::YahooFinanceSource;
//! use price_forecast::pipeline::{ForecastService, Market, SelectionChanged};
//!
//! # fn main() -> price_forecast::Result<()> {
//! let mut service = ForecastService::new(YahooFinanceSource::new()?);
//!
//! // One year ahead for AAPL
//! let output = service.handle(&SelectionChanged::new(Market::Equities, "AAPL", 1))?;
//!
//! for row in output.forecast.tail(5) {
//!     println!("{} {:.2} [{:.2}, {:.2}]", row.ds, row.yhat, row.yhat_lower, row.yhat_upper);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod holidays;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod utils;

// Re-export commonly used types
pub use crate::cache::{CachedSeries, SeriesCache};
pub use crate::data::{DataLoader, MarketDataSource, PriceBar, PriceSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{forecast, ForecastModel, ForecastResult, ModelConfig, TrainedForecastModel};
pub use crate::pipeline::{
    ForecastService, Market, PipelineOutput, PipelinePreset, SelectionChanged,
};
pub use crate::preprocess::{to_training_frame, TrainingFrame};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

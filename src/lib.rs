//! # Stock Forecaster
//!
//! Facade over the workspace libraries.
//!
//! ```
//! use stock_forecaster_workspace::price_forecast::pipeline::PipelinePreset;
//!
//! let crypto = PipelinePreset::crypto();
//! assert_eq!(crypto.title, "Crypto forecaster");
//! assert_eq!(crypto.horizon_unit.to_days(2).unwrap(), 14);
//! ```

pub use forecast_math;
pub use price_forecast;

pub use price_forecast::{
    forecast, to_training_frame, ForecastError, ForecastResult, ForecastService, Market,
    ModelConfig, PipelinePreset, SelectionChanged,
};

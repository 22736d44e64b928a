//! # Forecast Math
//!
//! Numerical building blocks for fitting decomposition forecasting models.
//! This crate provides a small dense matrix type, a Cholesky based ridge
//! least squares solver, Fourier seasonality features and a few slice
//! statistics.

use thiserror::Error;

pub mod fourier;
pub mod linalg;
pub mod stats;

pub use crate::linalg::Matrix;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;

//! Fourier series features for periodic components
//!
//! A seasonal effect with period `P` is approximated by
//! `Σ_{n=1..N} a_n sin(2πnt/P) + b_n cos(2πnt/P)`, so a design matrix
//! with `2N` columns per seasonality is enough to fit it linearly.

use crate::linalg::Matrix;
use crate::{MathError, Result};
use std::f64::consts::PI;

/// Fourier terms `[sin(2π·1·t/P), cos(2π·1·t/P), ..., sin(2π·N·t/P), cos(2π·N·t/P)]`
///
/// `t` and `period` share the same unit (days in practice).
pub fn fourier_terms(t: f64, period: f64, order: usize) -> Vec<f64> {
    let mut terms = Vec::with_capacity(2 * order);
    for n in 1..=order {
        let angle = 2.0 * PI * n as f64 * t / period;
        terms.push(angle.sin());
        terms.push(angle.cos());
    }
    terms
}

/// Build a `t.len() x 2·order` feature matrix
pub fn fourier_matrix(t: &[f64], period: f64, order: usize) -> Result<Matrix> {
    if period <= 0.0 || !period.is_finite() {
        return Err(MathError::InvalidInput(
            "Fourier period must be positive".to_string(),
        ));
    }
    if order == 0 {
        return Err(MathError::InvalidInput(
            "Fourier order must be at least 1".to_string(),
        ));
    }

    let rows: Vec<Vec<f64>> = t.iter().map(|&x| fourier_terms(x, period, order)).collect();
    if rows.is_empty() {
        return Ok(Matrix::zeros(0, 2 * order));
    }
    Matrix::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_terms_repeat_every_period() {
        let a = fourier_terms(3.0, 7.0, 3);
        let b = fourier_terms(10.0, 7.0, 3);
        assert_eq!(a.len(), 6);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_order_rejected() {
        assert!(fourier_matrix(&[1.0, 2.0], 7.0, 0).is_err());
        assert!(fourier_matrix(&[1.0, 2.0], -1.0, 2).is_err());
    }
}

//! Descriptive statistics over slices

use crate::{MathError, Result};

fn require_data(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "At least one value is required".to_string(),
        ));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    require_data(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of absolute values
pub fn mean_abs(values: &[f64]) -> Result<f64> {
    require_data(values)?;
    Ok(values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64)
}

/// Largest absolute value
pub fn max_abs(values: &[f64]) -> Result<f64> {
    require_data(values)?;
    Ok(values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_stats() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v).unwrap(), 5.0);
        assert_relative_eq!(mean_abs(&[-1.0, 3.0]).unwrap(), 2.0);
        assert_relative_eq!(max_abs(&[-3.0, 2.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(mean(&[]).is_err());
        assert!(mean_abs(&[]).is_err());
        assert!(max_abs(&[]).is_err());
    }
}

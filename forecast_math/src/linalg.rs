//! Dense linear algebra for least squares fitting
//!
//! Contains:
//! - A row-major `Matrix` used for regression design matrices
//! - Cholesky factorisation and solve for symmetric positive definite systems
//! - Ridge (Gaussian prior) least squares

use crate::{MathError, Result};

/// Row-major dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from a list of equally sized rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MathError::InvalidInput(format!(
                    "Row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow a single row
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Compute `X * v`
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.cols {
            return Err(MathError::InvalidInput(format!(
                "Vector length ({}) doesn't match matrix columns ({})",
                v.len(),
                self.cols
            )));
        }

        Ok((0..self.rows)
            .map(|r| self.row(r).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Compute the Gram matrix `Xᵀ X`
    pub fn gram(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.cols);
        for r in 0..self.rows {
            let row = self.row(r);
            for i in 0..self.cols {
                let xi = row[i];
                if xi == 0.0 {
                    continue;
                }
                for j in i..self.cols {
                    out.data[i * self.cols + j] += xi * row[j];
                }
            }
        }
        // mirror the upper triangle
        for i in 0..self.cols {
            for j in 0..i {
                out.data[i * self.cols + j] = out.data[j * self.cols + i];
            }
        }
        out
    }

    /// Compute `Xᵀ y`
    pub fn transpose_mul_vec(&self, y: &[f64]) -> Result<Vec<f64>> {
        if y.len() != self.rows {
            return Err(MathError::InvalidInput(format!(
                "Vector length ({}) doesn't match matrix rows ({})",
                y.len(),
                self.rows
            )));
        }

        let mut out = vec![0.0; self.cols];
        for (r, &yr) in y.iter().enumerate() {
            for (acc, x) in out.iter_mut().zip(self.row(r)) {
                *acc += x * yr;
            }
        }
        Ok(out)
    }
}

/// Solve `A x = b` for a symmetric positive definite `A` using Cholesky
pub fn cholesky_solve(a: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
    let n = a.rows();
    if a.cols() != n {
        return Err(MathError::InvalidInput(
            "Cholesky requires a square matrix".to_string(),
        ));
    }
    if b.len() != n {
        return Err(MathError::InvalidInput(format!(
            "Right hand side length ({}) doesn't match matrix size ({})",
            b.len(),
            n
        )));
    }

    // A = L Lᵀ, L stored row-major in the lower triangle
    let mut l = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a.get(i, j);
            for k in 0..j {
                sum -= l.get(i, k) * l.get(j, k);
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return Err(MathError::CalculationError(
                        "Matrix is not positive definite".to_string(),
                    ));
                }
                l.set(i, i, sum.sqrt());
            } else {
                l.set(i, j, sum / l.get(j, j));
            }
        }
    }

    // forward substitution: L z = b
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l.get(i, k) * z[k];
        }
        z[i] = sum / l.get(i, i);
    }

    // back substitution: Lᵀ x = z
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in i + 1..n {
            sum -= l.get(k, i) * x[k];
        }
        x[i] = sum / l.get(i, i);
    }

    Ok(x)
}

/// Ridge regression: minimise `||y - X β||² + Σ penalties[j] β[j]²`
///
/// A zero penalty leaves the coefficient unregularised. The system is solved
/// through the normal equations, so every column should be scaled to a
/// comparable magnitude by the caller.
pub fn ridge_solve(x: &Matrix, y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    if x.rows() == 0 {
        return Err(MathError::InsufficientData(
            "Design matrix has no rows".to_string(),
        ));
    }
    if penalties.len() != x.cols() {
        return Err(MathError::InvalidInput(format!(
            "Penalty length ({}) doesn't match matrix columns ({})",
            penalties.len(),
            x.cols()
        )));
    }
    if penalties.iter().any(|p| *p < 0.0 || !p.is_finite()) {
        return Err(MathError::InvalidInput(
            "Penalties must be finite and non-negative".to_string(),
        ));
    }

    let mut a = x.gram();
    for (j, p) in penalties.iter().enumerate() {
        // jitter keeps collinear unpenalised columns solvable
        a.set(j, j, a.get(j, j) + p + 1e-10);
    }
    let b = x.transpose_mul_vec(y)?;

    cholesky_solve(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gram_is_symmetric() {
        let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let g = x.gram();
        assert_relative_eq!(g.get(0, 0), 35.0);
        assert_relative_eq!(g.get(0, 1), 44.0);
        assert_relative_eq!(g.get(1, 0), 44.0);
        assert_relative_eq!(g.get(1, 1), 56.0);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert!(cholesky_solve(&a, &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }
}

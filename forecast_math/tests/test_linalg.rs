use approx::assert_abs_diff_eq;
use forecast_math::fourier::fourier_matrix;
use forecast_math::linalg::{cholesky_solve, ridge_solve, Matrix};
use rstest::rstest;

#[test]
fn test_cholesky_solves_known_system() {
    let a = Matrix::from_rows(&[
        vec![4.0, 12.0, -16.0],
        vec![12.0, 37.0, -43.0],
        vec![-16.0, -43.0, 98.0],
    ])
    .unwrap();
    let expected = [1.0, -2.0, 0.5];
    let b = a.mul_vec(&expected).unwrap();

    let x = cholesky_solve(&a, &b).unwrap();
    for (got, want) in x.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(got, want, epsilon = 1e-9);
    }
}

#[test]
fn test_ridge_without_penalty_recovers_line() {
    // y = 3 + 2x
    let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![1.0, i as f64 / 19.0]).collect();
    let y: Vec<f64> = rows.iter().map(|r| 3.0 + 2.0 * r[1]).collect();
    let x = Matrix::from_rows(&rows).unwrap();

    let beta = ridge_solve(&x, &y, &[0.0, 0.0]).unwrap();
    assert_abs_diff_eq!(beta[0], 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(beta[1], 2.0, epsilon = 1e-6);
}

#[rstest]
#[case(1.0)]
#[case(100.0)]
#[case(10_000.0)]
fn test_ridge_penalty_shrinks_coefficient(#[case] penalty: f64) {
    let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 / 9.0]).collect();
    let y: Vec<f64> = rows.iter().map(|r| 5.0 * r[0]).collect();
    let x = Matrix::from_rows(&rows).unwrap();

    let free = ridge_solve(&x, &y, &[0.0]).unwrap()[0];
    let shrunk = ridge_solve(&x, &y, &[penalty]).unwrap()[0];
    assert!(shrunk.abs() < free.abs());
    assert!(shrunk > 0.0);
}

#[test]
fn test_ridge_recovers_seasonal_signal() {
    let t: Vec<f64> = (0..70).map(|d| d as f64).collect();
    let features = fourier_matrix(&t, 7.0, 2).unwrap();
    let y: Vec<f64> = features.row_iter_values(|row| 0.7 * row[0] - 0.2 * row[3]);

    let beta = ridge_solve(&features, &y, &[0.0; 4]).unwrap();
    assert_abs_diff_eq!(beta[0], 0.7, epsilon = 1e-6);
    assert_abs_diff_eq!(beta[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(beta[3], -0.2, epsilon = 1e-6);
}

#[test]
fn test_ridge_rejects_mismatched_penalties() {
    let x = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
    assert!(ridge_solve(&x, &[1.0], &[0.0]).is_err());
    assert!(ridge_solve(&x, &[1.0], &[0.0, -1.0]).is_err());
}

trait RowValues {
    fn row_iter_values(&self, f: impl Fn(&[f64]) -> f64) -> Vec<f64>;
}

impl RowValues for Matrix {
    fn row_iter_values(&self, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
        (0..self.rows()).map(|r| f(self.row(r))).collect()
    }
}

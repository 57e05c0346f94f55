//! Ordinary least squares.
//!
//! The forecaster solves a tiny regression problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a constant column plus the time index. We solve it via SVD so that a
//! tall design matrix (many weeks, two columns) is handled directly.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Design matrix `[1, x_i]` for a single-feature regression with intercept.
pub fn intercept_design(xs: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(xs.len(), 2, |row, col| if col == 0 { 1.0 } else { xs[row] })
}

//! Linear trend fit over a positional time index.
//!
//! Each point of a date-ascending trend series gets the index `0..n-1`, and we
//! fit `value = slope * index + intercept` by OLS. Calendar spacing is ignored:
//! a missing week does not stretch the axis.

use nalgebra::DVector;
use serde::Serialize;
use tracing::debug;

use crate::domain::TrendPoint;
use crate::error::ForecastError;
use crate::math::{intercept_design, solve_least_squares};

/// Fitted line plus in-sample diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observed points used in the fit.
    pub n: usize,
    /// Coefficient of determination; `None` when the series is flat.
    pub r_squared: Option<f64>,
    pub rmse: f64,
}

impl LinearTrend {
    /// Evaluate the line at a (possibly out-of-sample) time index.
    pub fn predict(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }
}

/// Fit a line through `series`.
///
/// Requires at least two points in strictly ascending date order.
pub fn fit_trend(series: &[TrendPoint]) -> Result<LinearTrend, ForecastError> {
    let n = series.len();
    if n < 2 {
        return Err(ForecastError::InsufficientPoints { n });
    }
    if series.windows(2).any(|w| w[0].date >= w[1].date) {
        return Err(ForecastError::Unsorted);
    }

    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let ys = DVector::from_iterator(n, series.iter().map(|p| p.value));

    let beta = solve_least_squares(&intercept_design(&xs), &ys).ok_or(ForecastError::Singular)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let mean = ys.mean();
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let fitted = slope * x + intercept;
        sse += (y - fitted).powi(2);
        sst += (y - mean).powi(2);
    }
    let r_squared = (sst > 0.0).then(|| 1.0 - sse / sst);
    let rmse = (sse / n as f64).sqrt();

    debug!(n, slope, intercept, rmse, "fitted linear trend");

    Ok(LinearTrend {
        slope,
        intercept,
        n,
        r_squared,
        rmse,
    })
}

//! Sales forecasting.
//!
//! Responsibilities:
//!
//! - fit a linear trend over the positional time index (`linear`)
//! - extrapolate `horizon` future indices through the fitted line
//! - lay the predictions out on an anchored weekly calendar (`calendar`)
//!
//! Predictions are not clamped: a falling trend can extrapolate below zero.

pub mod calendar;
pub mod linear;

pub use calendar::future_dates;
pub use linear::{fit_trend, LinearTrend};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::domain::{ForecastPoint, TrendPoint, WeekAnchor};
use crate::error::ForecastError;

/// Forecast output: the fitted line and the projected points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub trend: LinearTrend,
    pub last_observed: NaiveDate,
    pub points: Vec<ForecastPoint>,
}

/// Fit `series` and project `horizon` weekly periods past its last date.
pub fn forecast(
    series: &[TrendPoint],
    horizon: usize,
    anchor: WeekAnchor,
) -> Result<Forecast, ForecastError> {
    let trend = fit_trend(series)?;
    // `fit_trend` has already required two or more points.
    let Some(last_observed) = series.last().map(|p| p.date) else {
        return Err(ForecastError::InsufficientPoints { n: series.len() });
    };

    let dates = future_dates(last_observed, horizon, anchor)?;
    let n = series.len();
    let points = dates
        .into_iter()
        .enumerate()
        .map(|(k, date)| ForecastPoint {
            date,
            predicted: trend.predict((n + k) as f64),
        })
        .collect::<Vec<_>>();

    info!(
        observed = n,
        horizon,
        slope = trend.slope,
        intercept = trend.intercept,
        "forecast ready"
    );

    Ok(Forecast {
        trend,
        last_observed,
        points,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Days, Weekday};

    use super::*;

    fn weekly(start: NaiveDate, values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                date: start + Days::new(7 * i as u64),
                value,
            })
            .collect()
    }

    #[test]
    fn perfect_line_extrapolates_exactly() {
        let start = NaiveDate::from_ymd_opt(2012, 10, 12).unwrap();
        let out = forecast(&weekly(start, &[10.0, 20.0, 30.0]), 2, WeekAnchor::Sun).unwrap();
        assert_eq!(out.points.len(), 2);
        assert!((out.points[0].predicted - 40.0).abs() < 1e-9);
        assert!((out.points[1].predicted - 50.0).abs() < 1e-9);
    }

    #[test]
    fn eight_week_horizon_has_weekly_dates() {
        let start = NaiveDate::from_ymd_opt(2010, 2, 5).unwrap();
        let series = weekly(start, &[5.0, 7.0, 6.0, 9.0, 8.0]);
        let out = forecast(&series, 8, WeekAnchor::Sun).unwrap();

        assert_eq!(out.points.len(), 8);
        assert_eq!(out.last_observed, series[4].date);
        assert!(out.points[0].date >= out.last_observed);
        for w in out.points.windows(2) {
            assert_eq!((w[1].date - w[0].date).num_days(), 7);
        }
        assert!(out.points.iter().all(|p| p.date.weekday() == Weekday::Sun));
    }

    #[test]
    fn predictions_are_not_clamped() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 7).unwrap();
        let out = forecast(&weekly(start, &[20.0, 10.0, 0.0]), 2, WeekAnchor::Fri).unwrap();
        assert!((out.points[0].predicted + 10.0).abs() < 1e-9);
        assert!((out.points[1].predicted + 20.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_series_fails() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 7).unwrap();
        let err = forecast(&weekly(start, &[1.0]), 8, WeekAnchor::Sun).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientPoints { n: 1 });
    }

    #[test]
    fn empty_series_and_absurd_horizon_fail() {
        assert_eq!(
            forecast(&[], 8, WeekAnchor::Sun).unwrap_err(),
            ForecastError::InsufficientPoints { n: 0 }
        );
        let start = NaiveDate::from_ymd_opt(2011, 1, 7).unwrap();
        let err = forecast(&weekly(start, &[1.0, 2.0]), usize::MAX, WeekAnchor::Sun).unwrap_err();
        assert_eq!(err, ForecastError::DateOutOfRange);
    }

    #[test]
    fn zero_horizon_still_reports_the_fit() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 7).unwrap();
        let out = forecast(&weekly(start, &[1.0, 2.0]), 0, WeekAnchor::Sun).unwrap();
        assert!(out.points.is_empty());
        assert!((out.trend.slope - 1.0).abs() < 1e-9);
    }
}

//! Export dashboard tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{ForecastPoint, StoreTotal, TrendPoint};
use crate::error::AppError;

#[derive(Serialize)]
struct TrendRow {
    date: String,
    weekly_sales: f64,
}

#[derive(Serialize)]
struct StoreRow<'a> {
    store: &'a str,
    weekly_sales: f64,
}

#[derive(Serialize)]
struct ForecastRow {
    date: String,
    predicted_sales: f64,
}

/// Write the date-grouped trend series.
pub fn write_trend_csv(path: &Path, trend: &[TrendPoint]) -> Result<(), AppError> {
    write_rows(
        path,
        trend.iter().map(|p| TrendRow {
            date: p.date.to_string(),
            weekly_sales: p.value,
        }),
    )
}

/// Write per-store totals.
pub fn write_store_csv(path: &Path, stores: &[StoreTotal]) -> Result<(), AppError> {
    write_rows(
        path,
        stores.iter().map(|s| StoreRow {
            store: s.store.as_str(),
            weekly_sales: s.value,
        }),
    )
}

/// Write forecast points.
pub fn write_forecast_csv(path: &Path, points: &[ForecastPoint]) -> Result<(), AppError> {
    write_rows(
        path,
        points.iter().map(|p| ForecastRow {
            date: p.date.to_string(),
            predicted_sales: p.predicted,
        }),
    )
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut n = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
        n += 1;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = n, "wrote export CSV");
    Ok(())
}

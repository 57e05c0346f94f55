//! Dashboard snapshot JSON.
//!
//! The snapshot is the render-ready representation of one dashboard state:
//! active filters, KPIs, trend, per-store totals, and the forecast (or the
//! reason it is unavailable). External front-ends can read it without linking
//! the crate.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::app::pipeline::DashboardOutput;
use crate::error::AppError;

/// Write the snapshot of `output` as pretty JSON.
pub fn write_snapshot_json(path: &Path, output: &DashboardOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &output.snapshot())
        .map_err(|e| AppError::new(4, format!("Failed to write snapshot JSON: {e}")))?;

    info!(path = %path.display(), "wrote dashboard snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::run_dashboard;
    use crate::domain::{FilterParams, ForecastConfig, SalesRecord, SalesTable, StoreId};

    #[test]
    fn snapshot_round_trips_through_serde_json() {
        let records = (0..3)
            .map(|i| SalesRecord {
                store: StoreId::from("7"),
                date: NaiveDate::from_ymd_opt(2010, 2, 5 + 7 * i).unwrap(),
                weekly_sales: 10.0 * (i + 1) as f64,
                holiday_flag: false,
                extras: Vec::new(),
            })
            .collect();
        let table = SalesTable::new(Vec::new(), records);
        let out = run_dashboard(&table, &FilterParams::everything(&table), &ForecastConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot_json(&path, &out).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["kpis"]["top_store"], "7");
        assert_eq!(value["trend"].as_array().unwrap().len(), 3);
        assert_eq!(value["forecast"]["points"].as_array().unwrap().len(), 8);
        assert_eq!(value["filters"]["holiday"], "all");
        assert!(value["forecast_error"].is_null());
    }
}

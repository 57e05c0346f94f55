//! Shared "dashboard pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> trend -> store totals -> KPIs -> forecast
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Every call is a full recomputation; nothing is cached between calls.

use serde::Serialize;
use tracing::info;

use crate::analysis::{apply, compute_kpis, sales_by_store, trend_series};
use crate::domain::{
    FilterParams, ForecastConfig, ForecastScope, Kpis, SalesTable, StoreTotal, TrendPoint,
};
use crate::error::{ForecastError, NoDataError};
use crate::forecast::{forecast, Forecast};

/// All computed outputs for one set of filter parameters.
#[derive(Debug, Clone)]
pub struct DashboardOutput {
    pub params: FilterParams,
    pub filtered: SalesTable,
    pub trend: Vec<TrendPoint>,
    pub store_sales: Vec<StoreTotal>,
    /// KPIs over the full, unfiltered history.
    pub kpis: Result<Kpis, NoDataError>,
    pub forecast: Result<Forecast, ForecastError>,
    pub forecast_config: ForecastConfig,
}

/// Run every stage for `params` against `table`.
///
/// KPI and forecast failures are kept in the output so the caller can decide
/// how to display them; filtering and aggregation never fail.
pub fn run_dashboard(
    table: &SalesTable,
    params: &FilterParams,
    forecast_config: &ForecastConfig,
) -> DashboardOutput {
    let filtered = apply(table, params);
    let trend = trend_series(&filtered);
    let store_sales = sales_by_store(&filtered);
    let kpis = compute_kpis(table);

    let forecast = match forecast_config.scope {
        ForecastScope::Full => forecast(
            &trend_series(table),
            forecast_config.horizon,
            forecast_config.week_anchor,
        ),
        ForecastScope::Filtered => forecast(&trend, forecast_config.horizon, forecast_config.week_anchor),
    };

    info!(
        rows = filtered.len(),
        dates = trend.len(),
        stores = store_sales.len(),
        forecast_ok = forecast.is_ok(),
        "dashboard recomputed"
    );

    DashboardOutput {
        params: params.clone(),
        filtered,
        trend,
        store_sales,
        kpis,
        forecast,
        forecast_config: *forecast_config,
    }
}

/// Render-ready, serializable view of a `DashboardOutput`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub filters: &'a FilterParams,
    pub rows: usize,
    pub kpis: Option<&'a Kpis>,
    pub kpi_error: Option<String>,
    pub trend: &'a [TrendPoint],
    pub store_sales: &'a [StoreTotal],
    pub forecast: Option<&'a Forecast>,
    pub forecast_error: Option<String>,
    pub forecast_config: &'a ForecastConfig,
}

impl DashboardOutput {
    pub fn snapshot(&self) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            filters: &self.params,
            rows: self.filtered.len(),
            kpis: self.kpis.as_ref().ok(),
            kpi_error: self.kpis.as_ref().err().map(ToString::to_string),
            trend: &self.trend,
            store_sales: &self.store_sales,
            forecast: self.forecast.as_ref().ok(),
            forecast_error: self.forecast.as_ref().err().map(ToString::to_string),
            forecast_config: &self.forecast_config,
        }
    }
}

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the loaded table (`SalesTable`, `SalesRecord`, `StoreId`)
//! - filter parameters (`FilterParams`, `HolidayMode`)
//! - render-ready outputs (`TrendPoint`, `StoreTotal`, `ForecastPoint`, `Kpis`)
//! - run configuration (`DashboardConfig`, `ForecastConfig`)

pub mod types;

pub use types::*;

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the filter/aggregate/forecast stages
//! - exported to JSON/CSV as render-ready tables
//! - handed to the terminal dashboard without conversion

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Store identifier as it appears in the source (numeric or free text).
///
/// Ordering is "natural": identifiers that parse as integers compare
/// numerically (so `2 < 10`) and sort before non-numeric ones, which compare
/// as strings. Integer ids are stored in canonical form, so `01` and `1`
/// name the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = raw.trim();
        match text.parse::<i64>() {
            Ok(n) => Self(n.to_string()),
            Err(_) => Self(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
}

impl Ord for StoreId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for StoreId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreId {
    fn from(value: &str) -> Self {
        StoreId::new(value)
    }
}

impl From<u32> for StoreId {
    fn from(value: u32) -> Self {
        StoreId(value.to_string())
    }
}

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub store: StoreId,
    pub date: NaiveDate,
    pub weekly_sales: f64,
    pub holiday_flag: bool,
    /// Pass-through cells, aligned with `SalesTable::extra_columns`.
    pub extras: Vec<String>,
}

/// Immutable, row-oriented sales table.
///
/// Every stage (filter, aggregate, forecast) reads a table and produces a new
/// value; nothing mutates a table after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesTable {
    extra_columns: Vec<String>,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    /// A new table with this table's column layout and the given rows.
    pub fn with_records(&self, records: Vec<SalesRecord>) -> Self {
        Self {
            extra_columns: self.extra_columns.clone(),
            records,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct stores, in natural order.
    pub fn stores(&self) -> BTreeSet<StoreId> {
        self.records.iter().map(|r| r.store.clone()).collect()
    }

    /// `(min, max)` of the date column, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Index of a pass-through column by header name (case-insensitive).
    pub fn extra_index(&self, name: &str) -> Option<usize> {
        self.extra_columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name.trim()))
    }
}

/// Holiday predicate applied by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayMode {
    #[default]
    All,
    HolidayOnly,
    NonHoliday,
}

impl HolidayMode {
    pub fn matches(self, holiday_flag: bool) -> bool {
        match self {
            HolidayMode::All => true,
            HolidayMode::HolidayOnly => holiday_flag,
            HolidayMode::NonHoliday => !holiday_flag,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HolidayMode::All => "All",
            HolidayMode::HolidayOnly => "Holiday Only",
            HolidayMode::NonHoliday => "Non-Holiday",
        }
    }

    pub fn next(self) -> Self {
        match self {
            HolidayMode::All => HolidayMode::HolidayOnly,
            HolidayMode::HolidayOnly => HolidayMode::NonHoliday,
            HolidayMode::NonHoliday => HolidayMode::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HolidayMode::All => HolidayMode::NonHoliday,
            HolidayMode::HolidayOnly => HolidayMode::All,
            HolidayMode::NonHoliday => HolidayMode::HolidayOnly,
        }
    }
}

/// Filter parameters supplied by a front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterParams {
    /// Inclusive lower bound.
    pub start: NaiveDate,
    /// Inclusive upper bound.
    pub end: NaiveDate,
    pub stores: BTreeSet<StoreId>,
    pub holiday: HolidayMode,
}

impl FilterParams {
    /// Parameters that keep every row of `table`: full date range, all stores,
    /// all holiday states.
    pub fn everything(table: &SalesTable) -> Self {
        let (start, end) = table
            .date_range()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self {
            start,
            end,
            stores: table.stores(),
            holiday: HolidayMode::All,
        }
    }
}

/// A single point of a trend series (date-ascending).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Summed measure for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreTotal {
    pub store: StoreId,
    pub value: f64,
}

/// A projected future value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
}

/// Headline summary scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub rows: usize,
    pub total_sales: f64,
    pub avg_sales: f64,
    pub top_store: StoreId,
    pub top_store_sales: f64,
}

/// Which trend series the forecaster is fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ForecastScope {
    /// Full-history trend, independent of the active filters.
    #[default]
    Full,
    /// Trend of the filtered view.
    Filtered,
}

/// Weekday that anchors the generated weekly forecast dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeekAnchor {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    #[default]
    Sun,
}

impl WeekAnchor {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekAnchor::Mon => Weekday::Mon,
            WeekAnchor::Tue => Weekday::Tue,
            WeekAnchor::Wed => Weekday::Wed,
            WeekAnchor::Thu => Weekday::Thu,
            WeekAnchor::Fri => Weekday::Fri,
            WeekAnchor::Sat => Weekday::Sat,
            WeekAnchor::Sun => Weekday::Sun,
        }
    }
}

/// Forecast knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastConfig {
    pub horizon: usize,
    pub week_anchor: WeekAnchor,
    pub scope: ForecastScope,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 8,
            week_anchor: WeekAnchor::Sun,
            scope: ForecastScope::Full,
        }
    }
}

/// A full run's configuration as understood by the front-ends.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,

    /// Filter overrides; `None`/empty means "whole dataset".
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub stores: Vec<StoreId>,
    pub holiday: HolidayMode,

    pub forecast: ForecastConfig,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_trend: Option<PathBuf>,
    pub export_stores: Option<PathBuf>,
    pub export_forecast: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl DashboardConfig {
    /// Resolve the configured overrides against a loaded table.
    pub fn filter_params(&self, table: &SalesTable) -> FilterParams {
        let mut params = FilterParams::everything(table);
        if let Some(start) = self.start {
            params.start = start;
        }
        if let Some(end) = self.end {
            params.end = end;
        }
        if !self.stores.is_empty() {
            params.stores = self.stores.iter().cloned().collect();
        }
        params.holiday = self.holiday;
        params
    }
}

//! Group-by-and-sum.
//!
//! `group_sum` is the only aggregation primitive; the trend series and the
//! per-store totals are thin typed wrappers around it.
//!
//! Groups are collected in a `BTreeMap`, so output order is deterministic:
//! ascending by date for date keys (required by the forecaster), natural store
//! order for store keys, `false` before `true` for the holiday flag.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::{SalesRecord, SalesTable, StoreId, StoreTotal, TrendPoint};
use crate::error::UnknownColumn;

/// Column to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupKey {
    Date,
    Store,
    Holiday,
}

/// Concrete value of a group key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Date(NaiveDate),
    Store(StoreId),
    Holiday(bool),
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValue::Date(d) => write!(f, "{d}"),
            KeyValue::Store(s) => write!(f, "{s}"),
            KeyValue::Holiday(h) => write!(f, "{}", u8::from(*h)),
        }
    }
}

/// Column to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    WeeklySales,
    /// Pass-through column by position in `SalesTable::extra_columns`.
    /// Empty or non-numeric cells are skipped.
    Extra(usize),
}

impl Measure {
    /// Resolve a measure by header name.
    pub fn resolve(table: &SalesTable, name: &str) -> Result<Self, UnknownColumn> {
        if name.trim().eq_ignore_ascii_case("weekly_sales") {
            return Ok(Measure::WeeklySales);
        }
        table
            .extra_index(name)
            .map(Measure::Extra)
            .ok_or_else(|| UnknownColumn(name.to_string()))
    }

    fn value(self, record: &SalesRecord) -> Option<f64> {
        match self {
            Measure::WeeklySales => Some(record.weekly_sales),
            Measure::Extra(idx) => record
                .extras
                .get(idx)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite()),
        }
    }
}

/// One output row of `group_sum`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: KeyValue,
    pub sum: f64,
}

/// Group `table` by `key` and sum `measure` per group.
///
/// Every key present in the input appears in the output (a group whose cells
/// are all skipped sums to `0.0`). An empty table yields no groups.
pub fn group_sum(table: &SalesTable, key: GroupKey, measure: Measure) -> Vec<Group> {
    let mut groups: BTreeMap<KeyValue, f64> = BTreeMap::new();
    for record in table.records() {
        let slot = groups.entry(key_of(record, key)).or_insert(0.0);
        if let Some(v) = measure.value(record) {
            *slot += v;
        }
    }

    debug!(?key, ?measure, rows = table.len(), groups = groups.len(), "grouped sales");

    groups
        .into_iter()
        .map(|(key, sum)| Group { key, sum })
        .collect()
}

fn key_of(record: &SalesRecord, key: GroupKey) -> KeyValue {
    match key {
        GroupKey::Date => KeyValue::Date(record.date),
        GroupKey::Store => KeyValue::Store(record.store.clone()),
        GroupKey::Holiday => KeyValue::Holiday(record.holiday_flag),
    }
}

/// Weekly sales summed per date, ascending by date.
pub fn trend_series(table: &SalesTable) -> Vec<TrendPoint> {
    group_sum(table, GroupKey::Date, Measure::WeeklySales)
        .into_iter()
        .filter_map(|g| match g.key {
            KeyValue::Date(date) => Some(TrendPoint { date, value: g.sum }),
            _ => None,
        })
        .collect()
}

/// Weekly sales summed per store, in natural store order.
pub fn sales_by_store(table: &SalesTable) -> Vec<StoreTotal> {
    group_sum(table, GroupKey::Store, Measure::WeeklySales)
        .into_iter()
        .filter_map(|g| match g.key {
            KeyValue::Store(store) => Some(StoreTotal { store, value: g.sum }),
            _ => None,
        })
        .collect()
}

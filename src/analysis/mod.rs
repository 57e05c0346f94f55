//! Table-level analysis stages.
//!
//! - `filter`: date/store/holiday predicates
//! - `aggregate`: group-by-and-sum (trend series, per-store totals)
//! - `kpi`: headline summary scalars
//! - `profile`: dataset exploration (head, numeric summary, missing values)

pub mod aggregate;
pub mod filter;
pub mod kpi;
pub mod profile;

pub use aggregate::{group_sum, sales_by_store, trend_series, Group, GroupKey, KeyValue, Measure};
pub use filter::apply;
pub use kpi::compute_kpis;
pub use profile::{profile, ColumnSummary, DatasetProfile};

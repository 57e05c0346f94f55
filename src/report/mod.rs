//! Reporting utilities: formatted terminal output for KPIs, tables, and profiles.
//!
//! We keep formatting code in one place so:
//! - the analysis/forecast code stays clean and testable
//! - output changes are localized (golden tests live next to the formatters)

pub mod format;

pub use format::*;

//! CSV ingest and normalization.
//!
//! This module turns a delimited sales export into a `SalesTable`:
//! - **Strict schema** for the four required columns (`Store`, `Date`,
//!   `Weekly_Sales`, `Holiday_Flag`), matched case-insensitively
//! - **Day-first dates** normalized to `NaiveDate`
//! - **Pass-through** for every other column, kept verbatim in source order
//!
//! Any unreadable file, missing column, or unparsable required cell is a
//! `LoadError`. There is no row skipping: a table that loads is fully valid.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{SalesRecord, SalesTable, StoreId};
use crate::error::LoadError;

const COL_STORE: &str = "store";
const COL_DATE: &str = "date";
const COL_WEEKLY_SALES: &str = "weekly_sales";
const COL_HOLIDAY_FLAG: &str = "holiday_flag";

/// Accepted date layouts. Day-first forms come first; ISO is accepted because
/// a four-digit leading year is unambiguous.
const DATE_FORMATS: [&str; 5] = ["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Resolved positions of the required columns.
#[derive(Debug, Clone, Copy)]
struct Layout {
    store: usize,
    date: usize,
    weekly_sales: usize,
    holiday_flag: usize,
}

/// Load the sales table at `path`.
pub fn load(path: &Path) -> Result<SalesTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        stores = table.stores().len(),
        "loaded sales table"
    );
    Ok(table)
}

/// Parse a sales table from any reader (used by `load` and by tests).
pub fn read_table<R: Read>(reader: R) -> Result<SalesTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let header_map = build_header_map(&headers);
    let layout = resolve_layout(&header_map)?;

    let required = [layout.store, layout.date, layout.weekly_sales, layout.holiday_flag];
    let extra_positions: Vec<usize> = (0..headers.len()).filter(|idx| !required.contains(idx)).collect();
    let extra_columns: Vec<String> = extra_positions
        .iter()
        .map(|&idx| clean_header(&headers[idx]).to_string())
        .collect();
    debug!(?extra_columns, "pass-through columns");

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| LoadError::Csv {
            line,
            message: e.to_string(),
        })?;
        records.push(parse_row(&record, layout, &extra_positions, line)?);
    }

    Ok(SalesTable::new(extra_columns, records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (clean_header(name).to_ascii_lowercase(), idx))
        .collect()
}

fn clean_header(name: &str) -> &str {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn resolve_layout(header_map: &HashMap<String, usize>) -> Result<Layout, LoadError> {
    let col = |name: &'static str| header_map.get(name).copied().ok_or(LoadError::MissingColumn(name));
    Ok(Layout {
        store: col(COL_STORE)?,
        date: col(COL_DATE)?,
        weekly_sales: col(COL_WEEKLY_SALES)?,
        holiday_flag: col(COL_HOLIDAY_FLAG)?,
    })
}

fn parse_row(
    record: &StringRecord,
    layout: Layout,
    extra_positions: &[usize],
    line: usize,
) -> Result<SalesRecord, LoadError> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    let store = cell(layout.store);
    if store.is_empty() {
        return Err(LoadError::Csv {
            line,
            message: "empty `Store` value".to_string(),
        });
    }

    let date = parse_date(cell(layout.date)).ok_or_else(|| LoadError::InvalidDate {
        line,
        value: cell(layout.date).to_string(),
    })?;

    let raw_sales = cell(layout.weekly_sales);
    let weekly_sales = raw_sales
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidNumber {
            line,
            column: "Weekly_Sales",
            value: raw_sales.to_string(),
        })?;

    let raw_flag = cell(layout.holiday_flag);
    let holiday_flag = parse_flag(raw_flag).ok_or_else(|| LoadError::InvalidFlag {
        line,
        value: raw_flag.to_string(),
    })?;

    let extras = extra_positions.iter().map(|&idx| cell(idx).to_string()).collect();

    Ok(SalesRecord {
        store: StoreId::new(store),
        date,
        weekly_sales,
        holiday_flag,
        extras,
    })
}

/// Parse a date with the day-first convention.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

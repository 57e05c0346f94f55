//! Dataset exploration: first rows, numeric summary, missing-value counts.
//!
//! Column order is canonical first (`Store`, `Date`, `Weekly_Sales`,
//! `Holiday_Flag`), then pass-through columns in source order.

use serde::Serialize;

use crate::domain::{SalesRecord, SalesTable};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n-1); `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCount {
    pub name: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub head: Vec<SalesRecord>,
    pub numeric: Vec<ColumnSummary>,
    pub missing: Vec<MissingCount>,
}

/// Profile `table`, keeping the first `head` rows verbatim.
pub fn profile(table: &SalesTable, head: usize) -> DatasetProfile {
    let records = table.records();
    let mut numeric = Vec::new();

    let store_values: Option<Vec<f64>> = records
        .iter()
        .map(|r| r.store.as_str().parse::<f64>().ok())
        .collect();
    if let Some(values) = store_values {
        numeric.extend(summarize("Store", values));
    }
    numeric.extend(summarize(
        "Weekly_Sales",
        records.iter().map(|r| r.weekly_sales).collect(),
    ));
    numeric.extend(summarize(
        "Holiday_Flag",
        records.iter().map(|r| if r.holiday_flag { 1.0 } else { 0.0 }).collect(),
    ));

    let mut missing: Vec<MissingCount> = ["Store", "Date", "Weekly_Sales", "Holiday_Flag"]
        .into_iter()
        .map(|name| MissingCount {
            name: name.to_string(),
            missing: 0,
        })
        .collect();

    for (idx, name) in table.extra_columns().iter().enumerate() {
        let cells: Vec<&str> = records
            .iter()
            .map(|r| r.extras.get(idx).map(String::as_str).unwrap_or("").trim())
            .collect();
        let present: Vec<&str> = cells.iter().copied().filter(|c| !c.is_empty()).collect();

        missing.push(MissingCount {
            name: name.clone(),
            missing: cells.len() - present.len(),
        });

        let parsed: Option<Vec<f64>> = present
            .iter()
            .map(|c| c.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        if let Some(values) = parsed {
            numeric.extend(summarize(name, values));
        }
    }

    DatasetProfile {
        rows: records.len(),
        head: records.iter().take(head).cloned().collect(),
        numeric,
        missing,
    }
}

fn summarize(name: &str, mut values: Vec<f64>) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n as f64 - 1.0)).sqrt()
    });

    Some(ColumnSummary {
        name: name.to_string(),
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

/// Linear interpolation between order statistics on sorted input.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::StoreId;

    fn rec(store: &str, sales: f64, holiday: bool, extras: &[&str]) -> SalesRecord {
        SalesRecord {
            store: StoreId::from(store),
            date: NaiveDate::from_ymd_opt(2010, 2, 5).unwrap(),
            weekly_sales: sales,
            holiday_flag: holiday,
            extras: extras.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn table() -> SalesTable {
        SalesTable::new(
            vec!["CPI".to_string(), "Region".to_string()],
            vec![
                rec("1", 1.0, false, &["210.5", "north"]),
                rec("1", 2.0, true, &["", "north"]),
                rec("2", 3.0, false, &["211.5", ""]),
                rec("2", 4.0, false, &["212.5", "south"]),
            ],
        )
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&sorted, 0.75) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn numeric_columns_include_numeric_pass_through_only() {
        let p = profile(&table(), 2);
        let names: Vec<&str> = p.numeric.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Store", "Weekly_Sales", "Holiday_Flag", "CPI"]);

        let sales = &p.numeric[1];
        assert_eq!(sales.count, 4);
        assert!((sales.mean - 2.5).abs() < 1e-12);
        let std = sales.std.unwrap();
        assert!((std - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);

        let cpi = &p.numeric[3];
        assert_eq!(cpi.count, 3);
        assert!((cpi.median - 211.5).abs() < 1e-12);
    }

    #[test]
    fn missing_counts_and_head() {
        let p = profile(&table(), 2);
        assert_eq!(p.rows, 4);
        assert_eq!(p.head.len(), 2);
        let missing: Vec<(&str, usize)> = p.missing.iter().map(|m| (m.name.as_str(), m.missing)).collect();
        assert_eq!(
            missing,
            [("Store", 0), ("Date", 0), ("Weekly_Sales", 0), ("Holiday_Flag", 0), ("CPI", 1), ("Region", 1)]
        );
    }

    #[test]
    fn empty_table_profiles_without_numeric_rows() {
        let p = profile(&SalesTable::default(), 5);
        assert_eq!(p.rows, 0);
        assert!(p.head.is_empty());
        assert!(p.numeric.is_empty());
    }

    #[test]
    fn single_value_has_no_std() {
        let s = summarize("x", vec![7.0]).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.q25, 7.0);
    }
}

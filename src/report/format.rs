//! Text formatting for terminal output.
//!
//! Money uses `$` with thousands separators. Tables are fixed-width and
//! right-trimmed so they paste cleanly into notes.

use crate::analysis::{DatasetProfile, Group};
use crate::app::pipeline::DashboardOutput;
use crate::domain::{FilterParams, Kpis, StoreTotal, TrendPoint};
use crate::error::NoDataError;
use crate::forecast::Forecast;

/// Format a value with `decimals` places and `,` thousands separators.
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `$1,234,567` style money.
pub fn fmt_money(v: f64, decimals: usize) -> String {
    let s = fmt_thousands(v, decimals);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}

/// KPI cards as three labelled lines.
pub fn format_kpis(kpis: &Result<Kpis, NoDataError>) -> String {
    let mut out = String::new();
    match kpis {
        Ok(k) => {
            out.push_str(&format!("Total Sales           {}\n", fmt_money(k.total_sales, 0)));
            out.push_str(&format!("Average Weekly Sales  {}\n", fmt_money(k.avg_sales, 2)));
            out.push_str(&format!(
                "Top Performing Store  Store {} ({})\n",
                k.top_store,
                fmt_money(k.top_store_sales, 0)
            ));
        }
        Err(e) => {
            out.push_str(&format!("KPIs unavailable: {e}\n"));
        }
    }
    out
}

/// One-line description of the active filters.
pub fn format_filters(params: &FilterParams, total_stores: usize) -> String {
    let stores = if params.stores.len() == total_stores {
        format!("all ({total_stores})")
    } else {
        let ids: Vec<&str> = params.stores.iter().map(|s| s.as_str()).collect();
        format!("{} of {total_stores} [{}]", ids.len(), ids.join(", "))
    };
    format!(
        "Filters: {} .. {} | stores: {stores} | holiday: {}",
        params.start,
        params.end,
        params.holiday.display_name()
    )
}

/// Full `summary` report.
pub fn format_summary(output: &DashboardOutput, total_stores: usize, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str("=== Sales Dashboard ===\n");
    out.push_str(&format_filters(&output.params, total_stores));
    out.push_str(&format!("\nRows: {}\n\n", output.filtered.len()));

    out.push_str(&format_kpis(&output.kpis));
    out.push('\n');

    out.push_str("Sales trend:\n");
    out.push_str(&format_trend_table(&output.trend));
    out.push('\n');

    out.push_str(&format!("Sales by store (top {top_n}):\n"));
    out.push_str(&format_store_table(&top_stores(&output.store_sales, top_n)));
    out.push('\n');

    out.push_str(&format!("Forecast (next {} weeks):\n", output.forecast_config.horizon));
    match &output.forecast {
        Ok(fc) => out.push_str(&format_forecast_table(fc)),
        Err(e) => out.push_str(&format!("unavailable: {e}\n")),
    }

    out
}

/// Highest `n` stores by value (ties keep store order).
pub fn top_stores(stores: &[StoreTotal], n: usize) -> Vec<StoreTotal> {
    let mut sorted = stores.to_vec();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted.truncate(n);
    sorted
}

pub fn format_trend_table(trend: &[TrendPoint]) -> String {
    if trend.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut out = table_header(&[("date", 10, false), ("weekly_sales", 18, true)]);
    for p in trend {
        push_line(&mut out, format!("{:<10} {:>18}", p.date, fmt_money(p.value, 2)));
    }
    out
}

pub fn format_store_table(stores: &[StoreTotal]) -> String {
    if stores.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut out = table_header(&[("store", 10, false), ("weekly_sales", 18, true)]);
    for s in stores {
        push_line(
            &mut out,
            format!("{:<10} {:>18}", truncate(s.store.as_str(), 10), fmt_money(s.value, 2)),
        );
    }
    out
}

pub fn format_forecast_table(fc: &Forecast) -> String {
    let mut out = String::new();
    let r2 = fc
        .trend
        .r_squared
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "fit: slope={}/wk intercept={} r2={r2} rmse={} n={} last={}\n",
        fmt_money(fc.trend.slope, 2),
        fmt_money(fc.trend.intercept, 2),
        fmt_money(fc.trend.rmse, 2),
        fc.trend.n,
        fc.last_observed,
    ));
    if fc.points.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    out.push_str(&table_header(&[("date", 10, false), ("predicted_sales", 18, true)]));
    for p in &fc.points {
        push_line(&mut out, format!("{:<10} {:>18}", p.date, fmt_money(p.predicted, 2)));
    }
    out
}

/// Generic `group_sum` output.
pub fn format_group_table(groups: &[Group], key_name: &str, measure_name: &str) -> String {
    if groups.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut out = table_header(&[(key_name, 12, false), (measure_name, 18, true)]);
    for g in groups {
        push_line(
            &mut out,
            format!("{:<12} {:>18}", truncate(&g.key.to_string(), 12), fmt_thousands(g.sum, 2)),
        );
    }
    out
}

/// `describe` report: head, numeric summary, missing values.
pub fn format_profile(profile: &DatasetProfile, extra_columns: &[String]) -> String {
    let mut out = String::new();

    out.push_str(&format!("First {} rows:\n", profile.head.len()));
    let mut header = format!("{:<8} {:<10} {:>14} {:>7}", "Store", "Date", "Weekly_Sales", "Holiday");
    for col in extra_columns {
        header.push_str(&format!(" {:>12}", truncate(col, 12)));
    }
    push_line(&mut out, header);
    for r in &profile.head {
        let mut line = format!(
            "{:<8} {:<10} {:>14.2} {:>7}",
            truncate(r.store.as_str(), 8),
            r.date,
            r.weekly_sales,
            u8::from(r.holiday_flag)
        );
        for cell in &r.extras {
            line.push_str(&format!(" {:>12}", truncate(cell, 12)));
        }
        push_line(&mut out, line);
    }

    out.push_str(&format!("\nSummary ({} rows):\n", profile.rows));
    out.push_str(&table_header(&[
        ("column", 14, false),
        ("count", 7, true),
        ("mean", 14, true),
        ("std", 14, true),
        ("min", 14, true),
        ("25%", 14, true),
        ("50%", 14, true),
        ("75%", 14, true),
        ("max", 14, true),
    ]));
    for c in &profile.numeric {
        let std = c.std.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string());
        push_line(
            &mut out,
            format!(
                "{:<14} {:>7} {:>14.4} {:>14} {:>14.4} {:>14.4} {:>14.4} {:>14.4} {:>14.4}",
                truncate(&c.name, 14),
                c.count,
                c.mean,
                std,
                c.min,
                c.q25,
                c.median,
                c.q75,
                c.max
            ),
        );
    }

    out.push_str("\nMissing values:\n");
    for m in &profile.missing {
        push_line(&mut out, format!("{:<14} {:>7}", truncate(&m.name, 14), m.missing));
    }

    out
}

fn table_header(cols: &[(&str, usize, bool)]) -> String {
    let mut names = Vec::with_capacity(cols.len());
    let mut rules = Vec::with_capacity(cols.len());
    for &(name, width, right) in cols {
        if right {
            names.push(format!("{name:>width$}"));
        } else {
            names.push(format!("{name:<width$}"));
        }
        rules.push("-".repeat(width));
    }
    let mut out = String::new();
    push_line(&mut out, names.join(" "));
    push_line(&mut out, rules.join(" "));
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::StoreId;

    #[test]
    fn thousands_separators() {
        assert_eq!(fmt_thousands(0.0, 0), "0");
        assert_eq!(fmt_thousands(999.0, 0), "999");
        assert_eq!(fmt_thousands(1000.0, 0), "1,000");
        assert_eq!(fmt_thousands(6_737_218_987.11, 2), "6,737,218,987.11");
        assert_eq!(fmt_thousands(-1234.5, 1), "-1,234.5");
        assert_eq!(fmt_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn money_puts_sign_before_dollar() {
        assert_eq!(fmt_money(1_046_964.88, 2), "$1,046,964.88");
        assert_eq!(fmt_money(-2500.0, 0), "-$2,500");
    }

    #[test]
    fn kpi_cards_and_no_data_message() {
        let kpis = Kpis {
            rows: 2,
            total_sales: 2_500_000.4,
            avg_sales: 1_250_000.2,
            top_store: StoreId::from("4"),
            top_store_sales: 2_000_000.0,
        };
        let txt = format_kpis(&Ok(kpis));
        assert!(txt.contains("Total Sales           $2,500,000\n"));
        assert!(txt.contains("Average Weekly Sales  $1,250,000.20\n"));
        assert!(txt.contains("Store 4"));

        assert_eq!(format_kpis(&Err(NoDataError)), "KPIs unavailable: no sales rows available\n");
    }

    #[test]
    fn trend_table_golden() {
        let trend = vec![
            TrendPoint { date: NaiveDate::from_ymd_opt(2010, 2, 5).unwrap(), value: 1234.5 },
            TrendPoint { date: NaiveDate::from_ymd_opt(2010, 2, 12).unwrap(), value: 99.0 },
        ];
        let expected = concat!(
            "date             weekly_sales\n",
            "---------- ------------------\n",
            "2010-02-05          $1,234.50\n",
            "2010-02-12             $99.00\n",
        );
        assert_eq!(format_trend_table(&trend), expected);
        assert_eq!(format_trend_table(&[]), "(no rows)\n");
    }

    #[test]
    fn group_table_golden() {
        use crate::analysis::KeyValue;
        let groups = vec![
            Group { key: KeyValue::Holiday(false), sum: 1500.0 },
            Group { key: KeyValue::Holiday(true), sum: 250.25 },
        ];
        let expected = concat!(
            "holiday            Weekly_Sales\n",
            "------------ ------------------\n",
            "0                      1,500.00\n",
            "1                        250.25\n",
        );
        assert_eq!(format_group_table(&groups, "holiday", "Weekly_Sales"), expected);
    }

    #[test]
    fn top_stores_sorts_descending() {
        let stores = vec![
            StoreTotal { store: StoreId::from("1"), value: 5.0 },
            StoreTotal { store: StoreId::from("2"), value: 9.0 },
            StoreTotal { store: StoreId::from("3"), value: 7.0 },
        ];
        let top = top_stores(&stores, 2);
        let ids: Vec<&str> = top.iter().map(|s| s.store.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
    }
}

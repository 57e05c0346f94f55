//! Headline KPIs: total, mean, and best store.

use crate::analysis::aggregate::sales_by_store;
use crate::domain::{Kpis, SalesTable};
use crate::error::NoDataError;

/// Compute KPIs over every row of `table`.
///
/// The top store is the one with the largest summed sales; on a tie the
/// lowest store identifier (natural order) wins.
pub fn compute_kpis(table: &SalesTable) -> Result<Kpis, NoDataError> {
    if table.is_empty() {
        return Err(NoDataError);
    }

    let rows = table.len();
    let total_sales: f64 = table.records().iter().map(|r| r.weekly_sales).sum();
    let avg_sales = total_sales / rows as f64;

    // `sales_by_store` is in ascending store order, so a strict `>` keeps the
    // lowest identifier among equal maxima.
    let mut best = None;
    for entry in sales_by_store(table) {
        let better = match &best {
            Some((_, value)) => entry.value > *value,
            None => true,
        };
        if better {
            best = Some((entry.store, entry.value));
        }
    }
    let (top_store, top_store_sales) = best.ok_or(NoDataError)?;

    Ok(Kpis {
        rows,
        total_sales,
        avg_sales,
        top_store,
        top_store_sales,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{SalesRecord, StoreId};

    fn rec(store: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            store: StoreId::from(store),
            date: NaiveDate::from_ymd_opt(2010, 2, 5).unwrap(),
            weekly_sales: sales,
            holiday_flag: false,
            extras: Vec::new(),
        }
    }

    #[test]
    fn totals_and_mean() {
        let table = SalesTable::new(vec![], vec![rec("1", 10.0), rec("1", 20.0), rec("2", 60.0)]);
        let kpis = compute_kpis(&table).unwrap();
        assert_eq!(kpis.rows, 3);
        assert!((kpis.total_sales - 90.0).abs() < 1e-12);
        assert!((kpis.avg_sales - 30.0).abs() < 1e-12);
    }

    #[test]
    fn top_store_is_argmax_of_summed_sales() {
        let table = SalesTable::new(vec![], vec![rec("A", 60.0), rec("B", 150.0), rec("A", 40.0)]);
        let kpis = compute_kpis(&table).unwrap();
        assert_eq!(kpis.top_store, StoreId::from("B"));
        assert!((kpis.top_store_sales - 150.0).abs() < 1e-12);
    }

    #[test]
    fn ties_go_to_the_lowest_store_id() {
        let table = SalesTable::new(vec![], vec![rec("10", 50.0), rec("9", 50.0), rec("11", 50.0)]);
        assert_eq!(compute_kpis(&table).unwrap().top_store, StoreId::from("9"));
    }

    #[test]
    fn empty_table_raises_no_data() {
        assert_eq!(compute_kpis(&SalesTable::default()), Err(NoDataError));
    }
}

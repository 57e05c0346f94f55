//! Row filtering.
//!
//! The three predicates (inclusive date range, store membership, holiday mode)
//! are independent and combined with AND, so the evaluation order does not
//! matter. The input table is never touched; the result is a new table that may
//! be empty.

use tracing::debug;

use crate::domain::{FilterParams, SalesRecord, SalesTable};

/// Apply `params` to `table` and return the matching rows as a new table.
pub fn apply(table: &SalesTable, params: &FilterParams) -> SalesTable {
    let records: Vec<SalesRecord> = table
        .records()
        .iter()
        .filter(|r| keeps(r, params))
        .cloned()
        .collect();

    debug!(
        input = table.len(),
        kept = records.len(),
        start = %params.start,
        end = %params.end,
        stores = params.stores.len(),
        holiday = ?params.holiday,
        "filtered sales table"
    );

    table.with_records(records)
}

/// Whether a single record passes every predicate.
pub fn keeps(record: &SalesRecord, params: &FilterParams) -> bool {
    params.start <= record.date
        && record.date <= params.end
        && params.stores.contains(&record.store)
        && params.holiday.matches(record.holiday_flag)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{HolidayMode, StoreId};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(store: &str, date: NaiveDate, sales: f64, holiday: bool) -> SalesRecord {
        SalesRecord {
            store: StoreId::from(store),
            date,
            weekly_sales: sales,
            holiday_flag: holiday,
            extras: vec![format!("{sales}")],
        }
    }

    fn table() -> SalesTable {
        SalesTable::new(
            vec!["Note".to_string()],
            vec![
                rec("1", ymd(2010, 2, 5), 100.0, false),
                rec("1", ymd(2010, 2, 12), 110.0, true),
                rec("2", ymd(2010, 2, 5), 200.0, false),
                rec("2", ymd(2010, 2, 12), 210.0, true),
                rec("3", ymd(2010, 2, 19), 300.0, false),
            ],
        )
    }

    fn stores(ids: &[&str]) -> BTreeSet<StoreId> {
        ids.iter().copied().map(StoreId::from).collect()
    }

    #[test]
    fn identity_filter_returns_input() {
        let t = table();
        let out = apply(&t, &FilterParams::everything(&t));
        assert_eq!(out, t);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let t = table();
        let params = FilterParams {
            start: ymd(2010, 2, 12),
            end: ymd(2010, 2, 12),
            ..FilterParams::everything(&t)
        };
        let out = apply(&t, &params);
        assert_eq!(out.len(), 2);
        assert!(out.records().iter().all(|r| r.date == ymd(2010, 2, 12)));
    }

    #[test]
    fn empty_store_set_yields_empty_table() {
        let t = table();
        let params = FilterParams {
            stores: BTreeSet::new(),
            ..FilterParams::everything(&t)
        };
        let out = apply(&t, &params);
        assert!(out.is_empty());
        assert_eq!(out.extra_columns(), t.extra_columns());
    }

    #[test]
    fn holiday_modes_partition_rows() {
        let t = table();
        let mut params = FilterParams::everything(&t);

        params.holiday = HolidayMode::HolidayOnly;
        let holidays = apply(&t, &params);
        assert!(holidays.records().iter().all(|r| r.holiday_flag));

        params.holiday = HolidayMode::NonHoliday;
        let regular = apply(&t, &params);
        assert!(regular.records().iter().all(|r| !r.holiday_flag));

        assert_eq!(holidays.len() + regular.len(), t.len());
    }

    #[test]
    fn output_is_subset_satisfying_all_predicates() {
        let t = table();
        let params = FilterParams {
            start: ymd(2010, 2, 1),
            end: ymd(2010, 2, 13),
            stores: stores(&["2", "3"]),
            holiday: HolidayMode::NonHoliday,
        };
        let out = apply(&t, &params);
        assert_eq!(out.len(), 1);
        for r in out.records() {
            assert!(t.records().contains(r));
            assert!(keeps(r, &params));
        }
        // The source table is unchanged.
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn unknown_store_and_inverted_range_give_empty_results() {
        let t = table();
        let params = FilterParams {
            stores: stores(&["99"]),
            ..FilterParams::everything(&t)
        };
        assert!(apply(&t, &params).is_empty());

        let params = FilterParams {
            start: ymd(2011, 1, 1),
            end: ymd(2010, 1, 1),
            ..FilterParams::everything(&t)
        };
        assert!(apply(&t, &params).is_empty());
    }
}

//! Future date generation on an anchored weekly calendar.
//!
//! The first date is the last observed date rolled forward to the anchor
//! weekday (unchanged if it already falls on it); every following date is
//! seven days later. With the default Sunday anchor and Friday-stamped sales
//! weeks, the first forecast date is the Sunday right after the last week.

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::WeekAnchor;
use crate::error::ForecastError;

/// `horizon` weekly dates starting at the first anchor day on or after `last`.
pub fn future_dates(
    last: NaiveDate,
    horizon: usize,
    anchor: WeekAnchor,
) -> Result<Vec<NaiveDate>, ForecastError> {
    let target = anchor.weekday().num_days_from_monday();
    let current = last.weekday().num_days_from_monday();
    let roll = (7 + target - current) % 7;

    let first = last
        .checked_add_days(Days::new(u64::from(roll)))
        .ok_or(ForecastError::DateOutOfRange)?;

    // Reject horizons the calendar cannot hold before allocating anything.
    let weeks_left = usize::try_from((NaiveDate::MAX - first).num_days() / 7).unwrap_or(usize::MAX);
    if horizon > 0 && horizon - 1 > weeks_left {
        return Err(ForecastError::DateOutOfRange);
    }

    let out: Vec<NaiveDate> = std::iter::successors(Some(first), |d| d.checked_add_days(Days::new(7)))
        .take(horizon)
        .collect();
    if out.len() < horizon {
        return Err(ForecastError::DateOutOfRange);
    }
    Ok(out)
}

//! Business-day calendar.
//!
//! Monday–Friday only. Exchange holidays are not excluded — the valuation on
//! a holiday simply reuses the latest earlier close, which is the same
//! degradation path as any other missing-price day.

use chrono::{Datelike, NaiveDate, Weekday};

/// Whether `date` falls on a weekday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All business days from `from` through `to`, inclusive on both ends.
///
/// Returns an empty vector when `from > to`.
pub fn business_days(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = from;
    while current <= to {
        if is_business_day(current) {
            days.push(current);
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

//! Calendar-day enumeration.
//!
//! Steps are calendar days (`NaiveDate::succ_opt`), never fixed 24h offsets,
//! so month and year boundaries come out right and time zones never enter.

use chrono::NaiveDate;

use crate::domain::{DateRange, format_ymd};

/// Every day from `start` to `end`, both included, ascending.
///
/// Returns an empty list when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut day = start;
    while day <= end {
        out.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Canonical day labels for a range.
pub fn enumerate_days(range: &DateRange) -> Vec<String> {
    days_between(range.start(), range.end())
        .into_iter()
        .map(format_ymd)
        .collect()
}

//! Raw payload → dense daily series.
//!
//! The provider controls the payload shape, so normalization is tolerant by
//! construction: it has no error path. Bad amounts become `0`, missing or
//! unreadable dates become `""` (which never matches a day of the range).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::domain::{AggregateFigures, DailyPoint, DateRange, Series, format_ymd};
use crate::normalize::keys::{PayloadKeys, find_array, find_present, find_truthy};
use crate::normalize::range::enumerate_days;

/// Strings at least this long are taken to be full dates already.
const FULL_DATE_MIN_LEN: usize = 8;

/// Lenient formats tried for short date strings, in order.
const SHORT_DATE_FMTS: [&str; 3] = ["%m/%d/%y", "%m-%d-%y", "%d.%m.%y"];

/// Floats below this magnitude convert to `i64` exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// One provider record after key resolution, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub amount: f64,
}

/// Everything the presentation layer needs from one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPayload {
    pub series: Series,
    pub figures: AggregateFigures,
    /// Number of records found in the candidate collection.
    pub records_seen: usize,
}

/// Normalize the whole payload: series for `range` plus summary figures.
pub fn normalize_payload(payload: &Value, range: &DateRange, keys: &PayloadKeys) -> NormalizedPayload {
    let records = extract_records(payload, keys);
    let records_seen = records.len();
    let series = fill_series(&records, range);
    let figures = extract_figures(payload, keys);

    debug!(
        records = records_seen,
        days = series.len(),
        total = series.total(),
        "normalized payload"
    );

    NormalizedPayload {
        series,
        figures,
        records_seen,
    }
}

/// Normalize only the series part of a payload.
pub fn normalize_series(payload: &Value, range: &DateRange, keys: &PayloadKeys) -> Series {
    fill_series(&extract_records(payload, keys), range)
}

/// Resolve the record collection and each record's date/amount.
pub fn extract_records(payload: &Value, keys: &PayloadKeys) -> Vec<RawRecord> {
    let Some(items) = find_array(payload, keys.series) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| RawRecord {
            date: find_truthy(item, keys.date)
                .map(value_text)
                .unwrap_or_default(),
            amount: find_present(item, keys.amount)
                .map(coerce_amount)
                .unwrap_or(0.0),
        })
        .collect()
}

/// Read the top-level order count and sales total.
pub fn extract_figures(payload: &Value, keys: &PayloadKeys) -> AggregateFigures {
    AggregateFigures {
        total_orders: find_present(payload, keys.total_orders).map(value_text),
        // A placeholder such as "n/a" must not hide a later numeric candidate.
        total_sales: keys
            .total_sales
            .iter()
            .filter_map(|key| payload.get(key))
            .find_map(numeric_value),
    }
}

/// Canonical `YYYY-MM-DD` form of a provider date.
///
/// Strings of 8+ characters are returned unchanged: re-parsing something that
/// already looks like a full date risks reinterpreting it.
pub fn canonicalize_date(raw: &str) -> String {
    if raw.len() >= FULL_DATE_MIN_LEN {
        return raw.to_string();
    }
    parse_short_date(raw.trim()).map(format_ymd).unwrap_or_default()
}

/// Numeric amount of a JSON value; anything unusable is `0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Bool(true) => 1.0,
        Value::String(s) if s.trim().is_empty() => 0.0,
        other => numeric_value(other).unwrap_or(0.0),
    };
    if amount.is_finite() && amount > 0.0 { amount } else { 0.0 }
}

fn fill_series(records: &[RawRecord], range: &DateRange) -> Series {
    let days = enumerate_days(range);

    if records.is_empty() {
        return Series::from_points(
            days.into_iter()
                .map(|date| DailyPoint { date, value: 0.0 })
                .collect(),
        );
    }

    let mut by_date: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        *by_date.entry(canonicalize_date(&record.date)).or_insert(0.0) += record.amount;
    }

    Series::from_points(
        days.into_iter()
            .map(|date| {
                let value = by_date.get(&date).copied().unwrap_or(0.0);
                DailyPoint { date, value }
            })
            .collect(),
    )
}

fn parse_short_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    SHORT_DATE_FMTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Display text of a scalar JSON value (strings without quotes, `3.0` as `3`).
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => format!("{}", v as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

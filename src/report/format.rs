//! Number and summary formatting for terminal output.
//!
//! We keep formatting code in one place so:
//! - the normalization code stays free of display concerns
//! - output changes are localized (important for the golden tests)

use crate::domain::{AggregateFigures, DateRange, Series, TransportKind};

/// Currency suffix appended to every sales amount.
pub const CURRENCY_SUFFIX: &str = "FCFA";

/// Thousands separator used by the French number format.
const GROUP_SEP: char = ' ';
/// Decimal separator used by the French number format.
const DECIMAL_SEP: char = ',';
/// Maximum fraction digits kept (same as the French locale default).
const MAX_FRACTION_DIGITS: u32 = 3;

/// French-style grouping: `1234567.5` → `1 234 567,5`.
///
/// At most three fraction digits are kept; trailing zeros are dropped.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let scale = 10_i128.pow(MAX_FRACTION_DIGITS);
    let scaled = (value * scale as f64).round() as i128;
    let negative = scaled < 0;
    let scaled = scaled.unsigned_abs();
    let int_part = scaled / scale as u128;
    let frac_part = scaled % scale as u128;

    let digits = int_part.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 8);
    if negative {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(GROUP_SEP);
        }
        out.push(ch);
    }

    if frac_part > 0 {
        let frac = format!("{frac_part:0width$}", width = MAX_FRACTION_DIGITS as usize);
        out.push(DECIMAL_SEP);
        out.push_str(frac.trim_end_matches('0'));
    }

    out
}

/// Amount with the currency suffix: `1 234 567 FCFA`.
pub fn format_currency(value: f64) -> String {
    format!("{} {CURRENCY_SUFFIX}", format_grouped(value))
}

/// Display text of the sales total (absent → `0 FCFA`).
pub fn format_total_sales(total: Option<f64>) -> String {
    format_currency(total.unwrap_or(0.0))
}

/// Display text of the order count: shown as the provider sent it.
pub fn format_total_orders(total: Option<&str>) -> String {
    total.unwrap_or("0").to_string()
}

/// Format a short run summary (range, KPIs, series sum, transport).
pub fn format_run_summary(
    range: &DateRange,
    series: &Series,
    figures: &AggregateFigures,
    transport: TransportKind,
) -> String {
    let mut out = String::new();

    out.push_str("=== sales - daily sales dashboard ===\n");
    out.push_str(&format!("Range: {range} ({} days)\n", series.len()));
    out.push_str(&format!("Source: {}\n", transport.display_name()));
    out.push_str(&format!(
        "Total orders: {}\n",
        format_total_orders(figures.total_orders.as_deref())
    ));
    out.push_str(&format!(
        "Total sales: {}\n",
        format_total_sales(figures.total_sales)
    ));
    out.push_str(&format!(
        "Series sum: {} | active days: {}\n",
        format_currency(series.total()),
        series.points().iter().filter(|p| p.value > 0.0).count()
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyPoint;
    use chrono::NaiveDate;

    #[test]
    fn groups_thousands_french_style() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1 000");
        assert_eq!(format_grouped(1_234_567.0), "1 234 567");
        assert_eq!(format_grouped(10_000_000.0), "10 000 000");
        assert_eq!(format_grouped(-45_000.0), "-45 000");
    }

    #[test]
    fn keeps_at_most_three_fraction_digits() {
        assert_eq!(format_grouped(1234.5), "1 234,5");
        assert_eq!(format_grouped(0.125), "0,125");
        assert_eq!(format_grouped(2.0004), "2");
        assert_eq!(format_grouped(f64::NAN), "0");
    }

    #[test]
    fn currency_and_kpi_text() {
        assert_eq!(format_total_sales(Some(1_234_567.0)), "1 234 567 FCFA");
        assert_eq!(format_total_sales(None), "0 FCFA");
        assert_eq!(format_total_orders(Some("42")), "42");
        assert_eq!(format_total_orders(None), "0");
    }

    #[test]
    fn summary_mentions_kpis_and_transport() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
        )
        .unwrap();
        let series = Series::from_points(vec![
            DailyPoint { date: "2025-09-01".to_string(), value: 1500.0 },
            DailyPoint { date: "2025-09-02".to_string(), value: 0.0 },
        ]);
        let figures = AggregateFigures {
            total_orders: Some("3".to_string()),
            total_sales: Some(1500.0),
        };

        let txt = format_run_summary(&range, &series, &figures, TransportKind::Jsonp);
        assert!(txt.contains("Range: 2025-09-01..2025-09-02 (2 days)"));
        assert!(txt.contains("Source: jsonp fallback"));
        assert!(txt.contains("Total orders: 3"));
        assert!(txt.contains("Total sales: 1 500 FCFA"));
        assert!(txt.contains("active days: 1"));
    }
}

//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - built fresh on every load cycle
//! - handed to the presentation layer as-is
//! - exported to JSON/CSV and reloaded later for plotting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical textual date form (`YYYY-MM-DD`).
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Format a calendar date in the canonical form.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Parse a canonical `YYYY-MM-DD` date.
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

/// Inclusive calendar-day range.
///
/// Construction guarantees `start <= end`, deserialization included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
            .ok_or_else(|| format!("range start {} is after end {}", raw.start, raw.end))
    }
}

impl DateRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both endpoints included.
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", format_ymd(self.start), format_ymd(self.end))
    }
}

/// One day of the normalized series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Canonical `YYYY-MM-DD` date.
    pub date: String,
    pub value: f64,
}

/// Dense daily series: one point per day of a range, ascending, no gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    points: Vec<DailyPoint>,
}

impl Series {
    /// Wrap already-ordered points.
    ///
    /// Only the normalizer and the JSON reader build series, both of which
    /// produce one point per consecutive day.
    pub fn from_points(points: Vec<DailyPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.date.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Sum of all daily values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Top-level summary figures reported by the provider.
///
/// These are read independently of the series and are not reconciled with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateFigures {
    /// Order count, kept as the provider's own text so it can be shown as-is.
    pub total_orders: Option<String>,
    pub total_sales: Option<f64>,
}

/// Which transport delivered the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain `GET` returning JSON.
    Direct,
    /// Callback-wrapped script (`name({...})`).
    Jsonp,
}

impl TransportKind {
    pub fn display_name(self) -> &'static str {
        match self {
            TransportKind::Direct => "direct",
            TransportKind::Jsonp => "jsonp fallback",
        }
    }
}

/// Exported series file.
///
/// This is the "portable" representation read back by `sales plot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub figures: AggregateFigures,
    pub series: Series,
}

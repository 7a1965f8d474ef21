//! Render-only chart description and its owned handle.

use tracing::debug;

use crate::domain::Series;

/// Fixed vertical axis range, in FCFA. Values outside are clipped when drawn.
pub const Y_AXIS_BOUNDS: [f64; 2] = [0.0, 10_000_000.0];

pub const CHART_TITLE: &str = "Daily sales (FCFA)";
pub const X_AXIS_LABEL: &str = "Date";
pub const Y_AXIS_LABEL: &str = "Amount (FCFA)";

/// A line chart ready to be drawn by any renderer (TUI widget, ASCII grid).
#[derive(Debug, Clone, PartialEq)]
pub struct SalesChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub y_bounds: [f64; 2],
}

impl SalesChart {
    pub fn from_series(series: &Series) -> Self {
        Self {
            labels: series.labels(),
            values: series.values(),
            y_bounds: Y_AXIS_BOUNDS,
        }
    }

    /// `(day index, value)` pairs with values clamped into the y bounds.
    pub fn clipped_points(&self) -> Vec<(f64, f64)> {
        let [y0, y1] = self.y_bounds;
        self.values
            .iter()
            .enumerate()
            .map(|(idx, &v)| (idx as f64, v.clamp(y0, y1)))
            .collect()
    }

    /// X bounds over day indices; a single day still gets a non-empty span.
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.values.len().saturating_sub(1).max(1);
        [0.0, last as f64]
    }

    /// Label for a (possibly fractional) day index, or empty when off-range.
    pub fn label_at(&self, x: f64) -> &str {
        let idx = x.round();
        if idx < 0.0 {
            return "";
        }
        self.labels.get(idx as usize).map(String::as_str).unwrap_or("")
    }
}

/// Exclusive owner of the currently displayed chart.
///
/// A handle is never updated in place: the adapter consumes the previous one
/// (tearing it down) and returns a new one.
#[derive(Debug)]
pub struct ChartHandle {
    generation: u64,
    chart: SalesChart,
}

impl ChartHandle {
    pub(crate) fn create(previous: Option<ChartHandle>, chart: SalesChart) -> Self {
        let generation = match previous {
            Some(prev) => {
                let generation = prev.generation;
                prev.destroy();
                generation + 1
            }
            None => 1,
        };
        debug!(generation, days = chart.values.len(), "chart created");
        Self { generation, chart }
    }

    /// Number of charts created so far in this view, this one included.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn chart(&self) -> &SalesChart {
        &self.chart
    }

    /// Tear the chart down.
    pub fn destroy(self) {
        debug!(generation = self.generation, "chart destroyed");
    }
}

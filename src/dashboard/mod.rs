//! Presentation adapter.
//!
//! The dashboard view is the presentation surface: two KPI displays, one
//! chart, and a message area. `render` is a pure sink: it writes the KPI
//! texts and swaps the chart handle, nothing else.

use crate::domain::{AggregateFigures, Series};
use crate::report::{format_total_orders, format_total_sales};

pub mod chart;

pub use chart::{ChartHandle, SalesChart};

/// The two numeric displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiDisplays {
    pub total_orders: String,
    pub total_sales: String,
}

impl Default for KpiDisplays {
    fn default() -> Self {
        Self {
            total_orders: "-".to_string(),
            total_sales: "-".to_string(),
        }
    }
}

/// Render a series and its figures.
///
/// `previous` is torn down before the new chart is created; the returned
/// handle is the only live chart.
pub fn render(
    kpis: &mut KpiDisplays,
    previous: Option<ChartHandle>,
    series: &Series,
    figures: &AggregateFigures,
) -> ChartHandle {
    kpis.total_orders = format_total_orders(figures.total_orders.as_deref());
    kpis.total_sales = format_total_sales(figures.total_sales);
    ChartHandle::create(previous, SalesChart::from_series(series))
}

/// Everything shown on screen, owned by the front-end.
#[derive(Debug, Default)]
pub struct DashboardView {
    pub kpis: KpiDisplays,
    pub message: Option<String>,
    chart: Option<ChartHandle>,
}

impl DashboardView {
    pub fn chart(&self) -> Option<&ChartHandle> {
        self.chart.as_ref()
    }

    /// Replace KPIs and chart with a fresh render and clear any message.
    pub fn show(&mut self, series: &Series, figures: &AggregateFigures) {
        let previous = self.chart.take();
        self.chart = Some(render(&mut self.kpis, previous, series, figures));
        self.message = None;
    }

    /// Show an error without touching the current chart or KPIs.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}

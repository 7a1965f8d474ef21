//! Shared load cycle used by both the one-shot and the TUI front-ends.
//!
//! One cycle: primary fetch → (fallback fetch) → normalize → render.
//!
//! The front-ends only decide *when* to run a cycle and how to show phases;
//! fetching, fallback, normalization and the render call live here.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::dashboard::DashboardView;
use crate::data::SalesSource;
use crate::domain::{AggregateFigures, DateRange, Series, TransportKind};
use crate::error::LoadError;
use crate::normalize::{PayloadKeys, normalize_payload};

/// User-visible message when a cycle ends without data.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load sales data (see log).";

/// Phases of a load cycle, reported in order to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Fetching,
    Fetched,
    FetchFailed,
    FallbackFetching,
    FallbackFailed,
    Rendering,
}

impl LoadPhase {
    pub fn display_name(self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Fetching => "fetching",
            LoadPhase::Fetched => "fetched",
            LoadPhase::FetchFailed => "fetch failed",
            LoadPhase::FallbackFetching => "fetching (fallback)",
            LoadPhase::FallbackFailed => "fallback failed",
            LoadPhase::Rendering => "rendering",
        }
    }
}

/// Outputs of a successful cycle.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub range: DateRange,
    pub series: Series,
    pub figures: AggregateFigures,
    pub transport: TransportKind,
    pub records_seen: usize,
}

/// Primary source, optional fallback, and the key table used to read payloads.
pub struct Loader {
    primary: Box<dyn SalesSource>,
    fallback: Option<Box<dyn SalesSource>>,
    keys: PayloadKeys,
}

impl Loader {
    pub fn new(primary: Box<dyn SalesSource>, fallback: Option<Box<dyn SalesSource>>) -> Self {
        Self {
            primary,
            fallback,
            keys: PayloadKeys::default(),
        }
    }

    pub fn with_keys(mut self, keys: PayloadKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Run one cycle for `range` and render the result into `view`.
    ///
    /// On failure the view gets a message and its chart is left untouched.
    pub fn load(
        &self,
        view: &mut DashboardView,
        range: &DateRange,
        observe: &mut dyn FnMut(LoadPhase),
    ) -> Result<LoadOutput, LoadError> {
        let fetched = self.fetch(range, observe);

        let (payload, transport) = match fetched {
            Ok(ok) => ok,
            Err(err) => {
                warn!(error = %err, "load failed");
                view.show_error(LOAD_FAILED_MESSAGE);
                observe(LoadPhase::Idle);
                return Err(err);
            }
        };

        let normalized = normalize_payload(&payload, range, &self.keys);
        log_figure_divergence(&normalized.series, &normalized.figures);

        observe(LoadPhase::Rendering);
        view.show(&normalized.series, &normalized.figures);
        info!(
            %range,
            days = normalized.series.len(),
            transport = transport.display_name(),
            "dashboard rendered"
        );
        observe(LoadPhase::Idle);

        Ok(LoadOutput {
            range: *range,
            series: normalized.series,
            figures: normalized.figures,
            transport,
            records_seen: normalized.records_seen,
        })
    }

    /// Primary fetch, then at most one fallback attempt.
    fn fetch(
        &self,
        range: &DateRange,
        observe: &mut dyn FnMut(LoadPhase),
    ) -> Result<(Value, TransportKind), LoadError> {
        observe(LoadPhase::Fetching);
        let primary_err = match self.primary.fetch(range) {
            Ok(payload) => {
                observe(LoadPhase::Fetched);
                return Ok((payload, self.primary.kind()));
            }
            Err(err) => err,
        };
        observe(LoadPhase::FetchFailed);
        warn!(error = %primary_err, "primary transport failed");

        let Some(fallback) = &self.fallback else {
            return Err(LoadError {
                primary: primary_err,
                fallback: None,
            });
        };

        observe(LoadPhase::FallbackFetching);
        match fallback.fetch(range) {
            Ok(payload) => {
                observe(LoadPhase::Fetched);
                Ok((payload, fallback.kind()))
            }
            Err(err) => {
                observe(LoadPhase::FallbackFailed);
                Err(LoadError {
                    primary: primary_err,
                    fallback: Some(err),
                })
            }
        }
    }
}

/// The provider's totals are shown as reported; only note when they disagree.
fn log_figure_divergence(series: &Series, figures: &AggregateFigures) {
    if let Some(total) = figures.total_sales {
        let sum = series.total();
        if (total - sum).abs() > 0.5 {
            debug!(reported = total, series_sum = sum, "reported total differs from series sum");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct FakeSource {
        kind: TransportKind,
        reply: Result<Value, FetchError>,
        calls: Rc<Cell<usize>>,
    }

    impl FakeSource {
        fn boxed(kind: TransportKind, reply: Result<Value, FetchError>) -> (Box<dyn SalesSource>, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let source = Self {
                kind,
                reply,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    impl SalesSource for FakeSource {
        fn kind(&self) -> TransportKind {
            self.kind
        }

        fn fetch(&self, _range: &DateRange) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
        )
        .unwrap()
    }

    fn payload() -> Value {
        json!({
            "daily": [
                {"date": "2025-09-01", "sales": 100},
                {"date": "2025-09-01", "sales": 50},
                {"date": "2025-09-03", "montant": 20},
            ],
            "totalOrders": 3,
            "totalSales": 170,
        })
    }

    fn run(loader: &Loader, view: &mut DashboardView) -> (Result<LoadOutput, LoadError>, Vec<LoadPhase>) {
        let mut phases = Vec::new();
        let result = loader.load(view, &range(), &mut |p| phases.push(p));
        (result, phases)
    }

    #[test]
    fn primary_success_renders_without_fallback() {
        let (primary, _) = FakeSource::boxed(TransportKind::Direct, Ok(payload()));
        let (fallback, fallback_calls) = FakeSource::boxed(TransportKind::Jsonp, Ok(json!({})));
        let loader = Loader::new(primary, Some(fallback));
        let mut view = DashboardView::default();

        let (result, phases) = run(&loader, &mut view);
        let out = result.unwrap();

        assert_eq!(out.transport, TransportKind::Direct);
        assert_eq!(out.series.values(), vec![150.0, 0.0, 20.0]);
        assert_eq!(fallback_calls.get(), 0);
        assert_eq!(
            phases,
            vec![LoadPhase::Fetching, LoadPhase::Fetched, LoadPhase::Rendering, LoadPhase::Idle]
        );
        assert_eq!(view.kpis.total_orders, "3");
        assert_eq!(view.kpis.total_sales, "170 FCFA");
        assert_eq!(view.chart().unwrap().chart().values, vec![150.0, 0.0, 20.0]);
    }

    #[test]
    fn fallback_success_still_renders() {
        let (primary, _) = FakeSource::boxed(TransportKind::Direct, Err(FetchError::Status(502)));
        let (fallback, fallback_calls) = FakeSource::boxed(TransportKind::Jsonp, Ok(payload()));
        let loader = Loader::new(primary, Some(fallback));
        let mut view = DashboardView::default();

        let (result, phases) = run(&loader, &mut view);
        let out = result.unwrap();

        assert_eq!(out.transport, TransportKind::Jsonp);
        assert_eq!(fallback_calls.get(), 1);
        assert_eq!(
            phases,
            vec![
                LoadPhase::Fetching,
                LoadPhase::FetchFailed,
                LoadPhase::FallbackFetching,
                LoadPhase::Fetched,
                LoadPhase::Rendering,
                LoadPhase::Idle,
            ]
        );
        assert_eq!(view.chart().unwrap().chart().values, vec![150.0, 0.0, 20.0]);
        assert!(view.message.is_none());
    }

    #[test]
    fn both_failing_shows_message_and_keeps_chart() {
        let mut view = DashboardView::default();
        view.show(&Series::default(), &AggregateFigures::default());
        let kpis_before = view.kpis.clone();

        let (primary, _) = FakeSource::boxed(
            TransportKind::Direct,
            Err(FetchError::Network("connection refused".to_string())),
        );
        let (fallback, _) = FakeSource::boxed(
            TransportKind::Jsonp,
            Err(FetchError::FallbackTimeout(Duration::from_secs(10))),
        );
        let loader = Loader::new(primary, Some(fallback));

        let (result, phases) = run(&loader, &mut view);
        let err = result.unwrap_err();

        assert_eq!(err.primary, FetchError::Network("connection refused".to_string()));
        assert_eq!(err.fallback, Some(FetchError::FallbackTimeout(Duration::from_secs(10))));
        assert_eq!(
            phases,
            vec![
                LoadPhase::Fetching,
                LoadPhase::FetchFailed,
                LoadPhase::FallbackFetching,
                LoadPhase::FallbackFailed,
                LoadPhase::Idle,
            ]
        );
        assert_eq!(view.message.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(view.chart().unwrap().generation(), 1);
        assert_eq!(view.kpis, kpis_before);
    }

    #[test]
    fn no_fallback_configured_fails_after_primary() {
        let (primary, primary_calls) = FakeSource::boxed(TransportKind::Direct, Err(FetchError::Status(500)));
        let loader = Loader::new(primary, None);
        let mut view = DashboardView::default();

        let (result, phases) = run(&loader, &mut view);
        let err = result.unwrap_err();

        assert_eq!(primary_calls.get(), 1);
        assert!(err.fallback.is_none());
        assert_eq!(phases, vec![LoadPhase::Fetching, LoadPhase::FetchFailed, LoadPhase::Idle]);
        assert!(view.chart().is_none());
        assert!(view.message.is_some());
    }

    #[test]
    fn unrecognized_payload_renders_zeros() {
        let (primary, _) = FakeSource::boxed(TransportKind::Direct, Ok(json!({"unexpected": true})));
        let loader = Loader::new(primary, None);
        let mut view = DashboardView::default();

        let (result, _) = run(&loader, &mut view);
        let out = result.unwrap();
        assert_eq!(out.series.values(), vec![0.0, 0.0, 0.0]);
        assert_eq!(out.records_seen, 0);
    }

    #[test]
    fn custom_key_table_is_used_for_lookup() {
        let reply = json!({
            "rows": [{"jour": "2025-09-02", "chiffre": 40}],
            "daily": [{"date": "2025-09-01", "sales": 999}],
            "commandes": 7,
        });
        let (primary, _) = FakeSource::boxed(TransportKind::Direct, Ok(reply));
        let keys = PayloadKeys {
            series: &["rows"],
            date: &["jour"],
            amount: &["chiffre"],
            total_orders: &["commandes"],
            ..PayloadKeys::default()
        };
        let loader = Loader::new(primary, None).with_keys(keys);
        let mut view = DashboardView::default();

        let (result, _) = run(&loader, &mut view);
        let out = result.unwrap();
        assert_eq!(out.series.values(), vec![0.0, 40.0, 0.0]);
        assert_eq!(view.kpis.total_orders, "7");
        assert_eq!(view.kpis.total_sales, "0 FCFA");
    }
}

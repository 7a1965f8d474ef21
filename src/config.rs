//! Run configuration, resolved once per orchestration start.
//!
//! Resolution is pure (today's date is an input) so the defaulting rules can
//! be tested without a clock.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::cli::SourceArgs;
use crate::domain::{DateRange, parse_ymd};
use crate::error::AppError;

/// Environment variable holding the endpoint when `--endpoint` is absent.
pub const ENDPOINT_ENV: &str = "SALES_API_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub range: DateRange,
    /// `None` disables the fallback transport.
    pub fallback_timeout: Option<Duration>,
}

impl DashboardConfig {
    /// Resolve CLI arguments (plus the endpoint from the environment).
    pub fn from_args(args: &SourceArgs, today: NaiveDate) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
        Self::resolve(args, env_endpoint.as_deref(), today)
    }

    pub fn resolve(args: &SourceArgs, env_endpoint: Option<&str>, today: NaiveDate) -> Result<Self, AppError> {
        let endpoint = args
            .endpoint
            .as_deref()
            .or(env_endpoint)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Missing sales endpoint: pass --endpoint or set {ENDPOINT_ENV} (.env)."),
                )
            })?
            .to_string();

        let range = resolve_range(args.start.as_deref(), args.end.as_deref(), today)?;

        if args.fallback_timeout_secs == 0 && !args.no_fallback {
            return Err(AppError::new(2, "--fallback-timeout-secs must be > 0."));
        }
        let fallback_timeout = (!args.no_fallback).then(|| Duration::from_secs(args.fallback_timeout_secs));

        Ok(Self {
            endpoint,
            range,
            fallback_timeout,
        })
    }
}

/// First day of `today`'s month.
pub fn default_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Resolve the start/end inputs; empty inputs take the defaults
/// (first day of the current month, today).
///
/// A reversed range is rejected rather than producing an empty chart.
pub fn resolve_range(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<DateRange, AppError> {
    let start = parse_input(start, "start")?.unwrap_or_else(|| default_start(today));
    let end = parse_input(end, "end")?.unwrap_or(today);

    DateRange::new(start, end).ok_or_else(|| {
        AppError::new(2, format!("Invalid range: start {start} is after end {end}."))
    })
}

fn parse_input(input: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_ymd(s)
            .map(Some)
            .ok_or_else(|| AppError::new(2, format!("Invalid {name} date '{s}'. Expected YYYY-MM-DD."))),
    }
}

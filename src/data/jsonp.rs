//! Fallback transport: callback-wrapped script delivery (JSONP).
//!
//! The same endpoint is requested with an extra `callback=<name>` parameter and
//! answers with a script such as `name({...});`. Each request registers a
//! fresh callback name so a stale response can never be mistaken for the
//! current one. Unlike the primary transport this one gives up after a fixed
//! timeout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::{SalesSource, range_query};
use crate::domain::{DateRange, TransportKind};
use crate::error::{AppError, FetchError};

/// Default wait before the fallback is abandoned.
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

const CALLBACK_PREFIX: &str = "salesCb";

static NEXT_CALLBACK: AtomicU64 = AtomicU64::new(0);

pub struct JsonpSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl JsonpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build fallback HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl SalesSource for JsonpSource {
    fn kind(&self) -> TransportKind {
        TransportKind::Jsonp
    }

    fn fetch(&self, range: &DateRange) -> Result<Value, FetchError> {
        let callback = next_callback_name();
        info!(endpoint = %self.endpoint, %range, %callback, "fetching sales data via fallback");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&range_query(range))
            .query(&[("callback", callback.as_str())])
            .send()
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::FallbackTransport(format!(
                "script load failed with status {status}"
            )));
        }

        let script = resp.text().map_err(|e| self.classify(e))?;
        debug!(bytes = script.len(), "fallback script received");
        unwrap_callback(&script, &callback)
    }
}

impl JsonpSource {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::FallbackTimeout(self.timeout)
        } else {
            FetchError::FallbackTransport(err.to_string())
        }
    }
}

/// A callback name unique within this process (and across runs in practice).
pub fn next_callback_name() -> String {
    let seq = NEXT_CALLBACK.fetch_add(1, Ordering::Relaxed);
    format!("{CALLBACK_PREFIX}_{}_{seq}", Utc::now().timestamp_millis())
}

/// Extract the JSON argument of `callback(...)` from a JSONP script.
///
/// Accepts an optional `/**/` prefix and a trailing `;`, which is what common
/// JSONP producers emit.
pub fn unwrap_callback(script: &str, callback: &str) -> Result<Value, FetchError> {
    let body = script.trim();
    let body = body.strip_prefix("/**/").unwrap_or(body).trim_start();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();

    let args = body
        .strip_prefix(callback)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| {
            FetchError::FallbackTransport(format!("script did not invoke callback `{callback}`"))
        })?;

    serde_json::from_str(args)
        .map_err(|e| FetchError::FallbackTransport(format!("callback argument is not JSON: {e}")))
}

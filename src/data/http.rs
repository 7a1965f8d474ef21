//! Primary transport: `GET <endpoint>?start=..&end=..` returning JSON.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::{SalesSource, range_query};
use crate::domain::{DateRange, TransportKind};
use crate::error::{AppError, FetchError};

pub struct HttpSource {
    client: Client,
    endpoint: String,
}

impl HttpSource {
    /// Build a client without a request timeout; the primary request waits
    /// for as long as the provider takes.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SalesSource for HttpSource {
    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }

    fn fetch(&self, range: &DateRange) -> Result<Value, FetchError> {
        info!(endpoint = %self.endpoint, %range, "fetching sales data");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&range_query(range))
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = resp.json().map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!(top_level_keys = ?body.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()), "api response");
        Ok(body)
    }
}

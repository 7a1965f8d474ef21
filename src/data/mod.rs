//! Remote sales data sources.
//!
//! - `SalesSource`: one way of turning a date range into a JSON payload
//! - `http`: the primary transport (plain JSON over `GET`)
//! - `jsonp`: the fallback transport (callback-wrapped script, fixed timeout)

use serde_json::Value;

use crate::domain::{DateRange, TransportKind};
use crate::error::FetchError;

pub mod http;
pub mod jsonp;

pub use http::HttpSource;
pub use jsonp::JsonpSource;

/// A transport able to fetch the raw payload for a date range.
pub trait SalesSource {
    fn kind(&self) -> TransportKind;

    fn fetch(&self, range: &DateRange) -> Result<Value, FetchError>;
}

/// `start`/`end` query pairs shared by both transports.
pub(crate) fn range_query(range: &DateRange) -> [(&'static str, String); 2] {
    [
        ("start", crate::domain::format_ymd(range.start())),
        ("end", crate::domain::format_ymd(range.end())),
    ]
}

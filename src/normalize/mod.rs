//! Payload normalization.
//!
//! Responsibilities:
//!
//! - candidate key tables for the provider's loosely named fields
//! - calendar-day enumeration for a date range
//! - turning a raw payload into a dense, zero-filled daily series

pub mod keys;
pub mod range;
pub mod series;

pub use keys::*;
pub use range::*;
pub use series::*;

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the requested date window (`DateRange`)
//! - the normalized daily series (`DailyPoint`, `Series`)
//! - provider summary figures (`AggregateFigures`)
//! - the exported series file (`SeriesFile`)

pub mod types;

pub use types::*;

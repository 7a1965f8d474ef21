//! Reporting utilities: KPI text, number formatting, run summaries.

pub mod format;

pub use format::*;

//! `sales-dash` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the normalization and load pipeline are testable without a terminal
//! - transports can be swapped for in-process fakes in tests
//! - the one-shot and TUI front-ends share one code path

pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod normalize;
pub mod plot;
pub mod report;
pub mod tui;

//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! configuration resolution (`crate::config`) and the load pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Daily sales dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch once, print the KPI figures and an ASCII chart, optionally export.
    Show(ShowArgs),
    /// Launch the interactive dashboard.
    ///
    /// Same load pipeline as `sales show`, rendered in a terminal UI with
    /// editable start/end dates and a reload key.
    Tui(SourceArgs),
    /// Plot a previously exported series JSON.
    Plot(PlotArgs),
}

/// Where to fetch from and which days to ask for.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Sales endpoint URL (falls back to `SALES_API_URL`).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// First day (YYYY-MM-DD). Defaults to the first day of the current month.
    #[arg(long)]
    pub start: Option<String>,

    /// Last day (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<String>,

    /// Do not retry through the JSONP fallback when the primary request fails.
    #[arg(long)]
    pub no_fallback: bool,

    /// Fallback transport timeout (seconds).
    #[arg(long, default_value_t = 10)]
    pub fallback_timeout_secs: u64,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Options for the one-shot dashboard.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Export the daily series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the daily series and figures to JSON (readable by `sales plot`).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Series JSON file produced by `sales show --export-json`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Logging options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Log filter used when `RUST_LOG` is not set (e.g. `info`, `sales_dash=debug`).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file instead of stderr (the TUI only logs to a file).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

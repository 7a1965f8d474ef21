//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the run configuration (endpoint, date range, fallback)
//! - runs the load pipeline
//! - prints reports/plots or hands over to the TUI
//! - writes optional exports

use chrono::Local;
use clap::Parser;
use tracing::info;

use crate::cli::{Command, PlotArgs, ShowArgs, SourceArgs};
use crate::config::DashboardConfig;
use crate::dashboard::DashboardView;
use crate::data::{HttpSource, JsonpSource, SalesSource};
use crate::error::AppError;
use crate::logging::{LoggingConfig, init_logging};

pub mod pipeline;

use pipeline::Loader;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sales` and `sales --start 2025-09-01` to behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => handle_tui(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    init_logging(&LoggingConfig::from_args(&args.source.log, false))?;

    let config = DashboardConfig::from_args(&args.source, Local::now().date_naive())?;
    let loader = build_loader(&config)?;
    let mut view = DashboardView::default();

    let out = loader.load(&mut view, &config.range, &mut |phase| {
        info!(phase = phase.display_name(), "load phase");
    });
    let out = match out {
        Ok(out) => out,
        Err(err) => {
            if let Some(message) = &view.message {
                eprintln!("{message}");
            }
            return Err(err.into());
        }
    };

    println!(
        "{}",
        crate::report::format_run_summary(&out.range, &out.series, &out.figures, out.transport)
    );

    if !args.no_plot {
        if let Some(handle) = view.chart() {
            println!(
                "{}",
                crate::plot::render_ascii_chart(handle.chart(), args.width, args.height)
            );
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &out.series)?;
        info!(path = %path.display(), "wrote series CSV");
    }
    if let Some(path) = &args.export_json {
        crate::io::write_series_json(path, &out.range, &out.series, &out.figures)?;
        info!(path = %path.display(), "wrote series JSON");
    }

    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    init_logging(&LoggingConfig::from_args(&args.log, true))?;

    let config = DashboardConfig::from_args(&args, Local::now().date_naive())?;
    let loader = build_loader(&config)?;
    crate::tui::run(loader, config.range)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    init_logging(&LoggingConfig::from_args(&args.log, false))?;

    let doc = crate::io::read_series_json(&args.series)?;

    // Re-render through the adapter so the KPIs come out exactly as in `show`.
    let mut view = DashboardView::default();
    view.show(&doc.series, &doc.figures);

    println!(
        "Total orders: {} | Total sales: {}",
        view.kpis.total_orders, view.kpis.total_sales
    );
    if let Some(handle) = view.chart() {
        println!(
            "{}",
            crate::plot::render_ascii_chart(handle.chart(), args.width, args.height)
        );
    }
    Ok(())
}

/// Primary transport plus, unless disabled, the JSONP fallback.
pub fn build_loader(config: &DashboardConfig) -> Result<Loader, AppError> {
    let primary: Box<dyn SalesSource> = Box::new(HttpSource::new(config.endpoint.clone())?);
    let fallback = match config.fallback_timeout {
        Some(timeout) => {
            let source: Box<dyn SalesSource> = Box::new(JsonpSource::new(config.endpoint.clone(), timeout)?);
            Some(source)
        }
        None => None,
    };
    Ok(Loader::new(primary, fallback))
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                          -> `sales tui`
/// - `sales --start 2025-09-01 ...`   -> `sales tui --start 2025-09-01 ...`
/// - `sales --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "tui" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

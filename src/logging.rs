//! `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over `--log-level`. The TUI owns the terminal,
//! so it only logs when a file is given.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub target: LogTarget,
}

impl LoggingConfig {
    /// Logs to the file when given, otherwise to stderr (or nowhere when
    /// `terminal_owned`).
    pub fn from_args(args: &LogArgs, terminal_owned: bool) -> Self {
        let target = match (&args.log_file, terminal_owned) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, false) => LogTarget::Stderr,
            (None, true) => LogTarget::Off,
        };
        Self {
            level: args.log_level.clone(),
            target,
        }
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let result = match &config.target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    result.map_err(|e| AppError::new(2, format!("Failed to initialize logging: {e}")))
}

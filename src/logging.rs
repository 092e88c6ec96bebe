//! Logging System
//!
//! Structured logging using the `tracing` crate. Logs go to stderr so stdout
//! carries only command output.

use crate::cli::GlobalOption;
use crate::error::ConfigError;
use serde::Serialize;
use std::io::IsTerminal;
use tracing::warn;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Full filter directive, e.g. `ecsdeploy=trace`. Overrides `--debug`.
pub const LOG_ENV: &str = "ECSDEPLOY_LOG";
/// `text` or `json`. Overrides `--log-format`.
pub const LOG_FORMAT_ENV: &str = "ECSDEPLOY_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text
    pub format: String,

    /// Colored output (text format only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            color: true,
        }
    }
}

impl LoggingConfig {
    /// Derive the logging setup from parsed global flags.
    pub fn from_global(global: &GlobalOption) -> Self {
        Self {
            level: if global.debug { "debug" } else { "info" }.to_string(),
            format: global.log_format.clone(),
            color: std::io::stderr().is_terminal(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (ECSDEPLOY_LOG, ECSDEPLOY_LOG_FORMAT)
/// 2. Global flags (`--debug`, `--log-format`)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let base_subscriber = Registry::default().with(filter);

    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level)
        .map_err(|e| ConfigError::Logging(format!("Invalid log level {:?}: {}", config.level, e)))
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, ConfigError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(ConfigError::Logging(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Log a value as pretty JSON at info level. Encoding failures are only
/// warned about.
pub fn log_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => tracing::info!("{}", json),
        Err(e) => warn!(error = %e, "failed to encode value for logging"),
    }
}

//! Structured logging for bodyrs
//!
//! Pretty, JSON or compact output on stderr, with an optional daily-rotated
//! JSON log file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Output format (pretty, json, compact)
    pub format: LogFormat,

    /// Log file path (None for console only)
    pub file_path: Option<PathBuf>,

    /// Include span information
    pub include_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: None,
            include_spans: false,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(&self) -> String {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
        .to_string()
    }

    /// Level for a `-v` count; zero keeps the configured level
    pub fn from_verbosity(verbose: u8, configured: LogLevel) -> LogLevel {
        match verbose {
            0 => configured,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON format for structured collection
    Json,
    /// Single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bodyrs={}", config.level.to_filter())));

    // stdout carries command output, so logs go to stderr
    let console_layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
            .with_span_events(if config.include_spans {
                FmtSpan::ENTER | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            })
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    if let Some(file_path) = &config.file_path {
        let directory = file_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(directory)?;

        let file_appender = tracing_appender::rolling::daily(
            directory,
            file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("bodyrs.log"),
        );

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_target(true)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans);

        subscriber.with(file_layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    tracing::debug!(
        level = ?config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}

//! Logging setup.
//!
//! This module provides a configurable tracing subscriber that:
//! - Writes to stderr by default, or to a file when the terminal is busy
//!   drawing the interactive widget, or nowhere at all
//! - Supports configurable log levels via `RUST_LOG` or programmatic configuration
//! - Includes timestamps in all log entries unless told otherwise

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level - least verbose
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert verbosity count to log level.
    /// 0 = Info, 1 = Debug, 2+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error
    #[default]
    Stderr,
    /// Append to a file
    File(PathBuf),
    /// Install no subscriber at all; `RUST_LOG` cannot turn output back on
    Discard,
}

/// Configuration for the logging subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: LogLevel,
    /// Where to write
    pub target: LogTarget,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include the target (module path)
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            target: LogTarget::Stderr,
            with_timestamps: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the output target.
    pub fn with_log_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether to include timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    /// Set whether to include the target (module path).
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Create a configuration from verbosity level (0 = info, 1 = debug, 2+ = trace).
    pub fn from_verbosity(verbosity: u8) -> Self {
        Self::default().with_level(LogLevel::from(verbosity))
    }

    fn env_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.level.directive())
        }
    }
}

/// Initialize logging with the given configuration.
///
/// Call once at startup. A second call is ignored, which keeps tests that
/// spin up the CLI path from panicking.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    if config.target == LogTarget::Discard {
        return Ok(());
    }

    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.env_filter())
        .with_target(config.with_target);

    // Each writer produces a different builder type, so each branch finishes
    // its own subscriber.
    match (&config.target, config.with_timestamps) {
        (LogTarget::Stderr, true) => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        (LogTarget::Stderr, false) => {
            let _ = builder.with_writer(std::io::stderr).without_time().try_init();
        }
        (LogTarget::Discard, _) => {}
        (LogTarget::File(path), with_time) => {
            let file = File::options().create(true).append(true).open(path)?;
            let builder = builder.with_writer(Mutex::new(file)).with_ansi(false);
            if with_time {
                let _ = builder.try_init();
            } else {
                let _ = builder.without_time().try_init();
            }
        }
    }
    Ok(())
}

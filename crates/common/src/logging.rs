//! Logger construction
//!
//! Services build a [`Logger`] explicitly from [`LogConfig`] and then either
//! install it for the whole process or enter it for a scope. `RUST_LOG`
//! takes precedence over the configured filter.

use std::str::FromStr;

use tracing::dispatcher::{self, DefaultGuard};
use tracing::Dispatch;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::get_env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `svckit_queue=debug,info`
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// `LOG_LEVEL` and `LOG_FORMAT`; an unknown format falls back to pretty
    pub fn from_env() -> Self {
        Self {
            filter: get_env("LOG_LEVEL", "info"),
            format: get_env("LOG_FORMAT", "pretty")
                .parse()
                .unwrap_or(LogFormat::Pretty),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("unknown log format '{0}' (expected pretty, compact or json)")]
    InvalidFormat(String),

    #[error("a global logger is already installed")]
    AlreadyInstalled,
}

/// A configured tracing subscriber that has not been installed yet
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

/// Restores the previous logger for this thread when dropped
#[must_use = "the logger is removed as soon as the guard is dropped"]
pub struct LogGuard {
    _guard: DefaultGuard,
}

impl Logger {
    pub fn new(config: &LogConfig) -> Result<Self, LoggingError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                EnvFilter::try_new(&config.filter).map_err(|e| LoggingError::InvalidFilter {
                    filter: config.filter.clone(),
                    reason: e.to_string(),
                })?
            }
        };

        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let dispatch = match config.format {
            LogFormat::Pretty => Dispatch::new(builder.pretty().finish()),
            LogFormat::Compact => Dispatch::new(builder.compact().finish()),
            LogFormat::Json => Dispatch::new(builder.json().finish()),
        };

        Ok(Self { dispatch })
    }

    /// Install as the process-wide logger. Can only succeed once per process.
    pub fn install(self) -> Result<(), LoggingError> {
        self.dispatch
            .try_init()
            .map_err(|_| LoggingError::AlreadyInstalled)
    }

    /// Use this logger on the current thread until the guard is dropped
    pub fn scoped(&self) -> LogGuard {
        LogGuard {
            _guard: dispatcher::set_default(&self.dispatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_scoped_logger_can_be_entered_and_dropped() {
        let logger = Logger::new(&LogConfig {
            filter: "debug".to_string(),
            format: LogFormat::Compact,
        })
        .unwrap();

        {
            let _guard = logger.scoped();
            tracing::debug!("inside scoped logger");
        }
        tracing::debug!("after scoped logger");
    }

    #[test]
    fn test_install_only_once() {
        let config = LogConfig {
            filter: "info".to_string(),
            format: LogFormat::Json,
        };
        let first = Logger::new(&config).unwrap().install();
        let second = Logger::new(&config).unwrap().install();
        assert!(first.is_ok());
        assert!(matches!(second, Err(LoggingError::AlreadyInstalled)));
    }
}

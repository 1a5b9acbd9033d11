//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for the dispatcher host: a compact
//! console layer, an optional daily rolling file layer written through a non-blocking
//! worker, and optional JSON formatting for both.
//!
//! Filtering starts from the configured level; a full `EnvFilter` directive
//! (`"trellis_core=debug,tower_http=info"`) replaces it, and without one `RUST_LOG` is
//! honored.
//!
//! ## Example
//!
//! ```rust
//! # use trellis_logger::{LevelFilter, Logger};
//! let _logger = Logger::builder()
//!     .name("trellis")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_NAME: &str = "trellis";
const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

/// Builder for the global subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    filter: Option<String>,
    console: bool,
    json: bool,
    directory: Option<PathBuf>,
    max_files: usize,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            level: LevelFilter::INFO,
            filter: None,
            console: true,
            json: false,
            directory: None,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl LoggerBuilder {
    /// Prefix of rolling log files (`trellis.2026-10-16.log`).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Parses a level name such as `"debug"` or `"off"`.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn level_name(self, level: &str) -> Result<Self, LoggerError> {
        let level = level.trim().parse::<LevelFilter>().map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid log level '{level}': {e}").into(),
            context: None,
        })?;
        Ok(self.level(level))
    }

    /// Explicit `EnvFilter` directive; invalid directives fail [`LoggerBuilder::init`].
    #[must_use]
    pub fn filter(mut self, filter: Option<impl Into<String>>) -> Self {
        self.filter = filter.map(Into::into);
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Enables daily rolling files under `directory`.
    #[must_use]
    pub fn directory(mut self, directory: Option<impl Into<PathBuf>>) -> Self {
        self.directory = directory.map(Into::into);
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown so buffered file output is flushed.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] when a global subscriber already exists,
    /// [`LoggerError::InvalidConfiguration`] for an empty name, a bad filter or no outputs,
    /// and [`LoggerError::Appender`] / [`LoggerError::Internal`] when the log directory
    /// cannot be prepared.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let env_filter = self.env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            let console = layer().with_ansi(!self.json);
            layers.push(if self.json { console.json().boxed() } else { console.compact().boxed() });
        }

        let guard = match &self.directory {
            Some(directory) => {
                fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: Some(format!("Failed to create path: {}", directory.display()).into()),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(self.max_files)
                    .build(directory)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file = layer().with_writer(writer).with_ansi(false);
                layers.push(if self.json { file.json().boxed() } else { file.boxed() });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let invalid = |message: &'static str| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        };

        if self.name.trim().is_empty() {
            return invalid("Logger name cannot be empty");
        }
        if self.max_files == 0 {
            return invalid("max_files must be greater than zero");
        }
        if !self.console && self.directory.is_none() {
            return invalid("No logging output enabled. Enable the console or a log directory.");
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.filter.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |filter| {
                builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{filter}': {e}").into(),
                    context: None,
                })
            },
        )
    }
}

/// Handle to the installed subscriber; owns the file worker guard.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Whether a file writer is attached.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder();
        assert_eq!(builder.name, "trellis");
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.console);
        assert!(!builder.json);
        assert!(builder.directory.is_none());
    }

    #[test]
    fn level_names_parse() {
        let builder = Logger::builder().level_name(" debug ").unwrap();
        assert_eq!(builder.level, LevelFilter::DEBUG);
        assert!(Logger::builder().level_name("loud").is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("  ").validate().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn no_output_is_rejected() {
        let err = Logger::builder().console(false).validate().unwrap_err();
        assert!(err.to_string().contains("No logging output enabled"));
        assert!(Logger::builder().console(false).directory(Some("logs")).validate().is_ok());
    }

    #[test]
    fn bad_filter_is_rejected() {
        let err = Logger::builder().filter(Some("trellis_core=loudest")).env_filter().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}

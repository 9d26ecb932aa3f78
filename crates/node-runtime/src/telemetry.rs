//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: human-readable by default,
//! JSON for containers.
//!
//! A second, plain-text layer writes to the node log file. The file only
//! exists once the data directory is initialized, so that layer discards
//! events until [`LogFileHandle::attach`] is called.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::parse_flag;

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level filter could not be parsed.
    #[error("Invalid log filter {filter:?}: {message}")]
    InvalidFilter { filter: String, message: String },

    /// A global subscriber was already installed.
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `node_init=debug,info`.
    pub log_level: String,
    /// One JSON object per line instead of plain text.
    pub json_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables.
    ///
    /// - `QC_LOG_LEVEL` or `RUST_LOG`: Level filter (default: info)
    /// - `QC_JSON_LOGS`: JSON output (default: true inside containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            log_level: env::var("QC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("QC_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        EnvFilter::try_new(&self.log_level).map_err(|e| TelemetryError::InvalidFilter {
            filter: self.log_level.clone(),
            message: e.to_string(),
        })
    }
}

/// Late-bound target of the log file layer.
#[derive(Debug, Clone, Default)]
pub struct LogFileHandle {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFileHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start appending events to `path`. Replaces any earlier file.
    pub fn attach(&self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.file.lock() = Some(file);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.file.lock().is_some()
    }
}

/// Writer for one event.
pub struct LogFileWriter {
    file: Arc<Mutex<Option<File>>>,
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.lock().as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileHandle {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// Returns the handle of the log file layer; attach it once the log file
/// exists.
pub fn init_logging(config: &LogConfig) -> Result<LogFileHandle, TelemetryError> {
    let env_filter = config.env_filter()?;
    let log_file = LogFileHandle::new();
    fn file_layer<S>(log_file: &LogFileHandle) -> impl tracing_subscriber::Layer<S>
    where
        S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
    {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(log_file.clone())
    }

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(file_layer(&log_file))
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer(&log_file))
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_directive_filter_is_accepted() {
        let config = LogConfig {
            log_level: "node_init=debug,chain_db=trace,info".to_string(),
            json_logs: false,
        };
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LogConfig {
            log_level: "node_init=notalevel".to_string(),
            json_logs: true,
        };
        assert!(matches!(
            config.env_filter(),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_log_file_receives_events_only_after_attach() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.log");
        let handle = LogFileHandle::new();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(handle.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("before attach");
            assert!(!handle.is_attached());

            std::fs::write(&path, b"").unwrap();
            handle.attach(&path).unwrap();
            tracing::info!("after attach");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("after attach"));
        assert!(!contents.contains("before attach"));
    }

    #[test]
    fn test_attach_appends_to_existing_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let handle = LogFileHandle::new();
        handle.attach(&path).unwrap();
        handle.make_writer().write_all(b"next run\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "earlier run\nnext run\n"
        );
    }
}

//! Structured logging for the HSN webhook
//!
//! Console output is JSONL by default so it can be shipped straight to a log
//! aggregator; [`ConsoleOutput::Pretty`] switches to text. The file sink
//! from [`LogConfig::production`] writes JSONL that rotates daily.
//!
//! # Quick Start
//!
//! ```ignore
//! use hsn_logging::{HsnSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! let _guard = HsnSubscriberBuilder::new().init();
//!
//! // Console plus daily files under ./logs
//! let _guard = HsnSubscriberBuilder::new()
//!     .with_config(LogConfig::production("./logs"))
//!     .init();
//! ```
//!
//! # Request Context
//!
//! Each webhook call runs inside the span produced by
//! [`RequestContext::span`], so every line it logs carries the request id.

pub mod config;
pub mod context;
pub mod layers;

pub use config::{ConsoleOutput, EventFields, FileConfig, FileRotation, LogConfig};
pub use context::RequestContext;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::layers::BoxedLayer;

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The log file or its directory could not be created
    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),

    /// A global subscriber is already installed
    #[error("Global subscriber already set: {0}")]
    AlreadySet(#[from] tracing_subscriber::util::TryInitError),
}

/// Builder for configuring and initializing the global subscriber
pub struct HsnSubscriberBuilder {
    config: LogConfig,
}

impl Default for HsnSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HsnSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: JSONL output to console at `info`
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Install the subscriber globally.
    ///
    /// `RUST_LOG` takes precedence over the configured default level. The
    /// returned guard flushes the file sink on drop and must be held for the
    /// life of the process when file output is enabled.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogInitError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.level));

        let fields = self.config.fields;
        let mut outputs: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        outputs.extend(layers::console_layer(self.config.console, fields));

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = layers::file_writer(file_config)?;
            outputs.push(layers::jsonl_file_layer(writer, fields));
            guard = Some(file_guard);
        }

        Registry::default()
            .with(env_filter)
            .with(outputs)
            .try_init()?;

        Ok(guard)
    }

    /// Install the subscriber globally, reporting failures on stderr.
    ///
    /// Suitable for binaries that would rather keep running without logs
    /// than abort on a second initialization.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: failed to initialize logging: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_json_console() {
        let builder = HsnSubscriberBuilder::new();
        assert_eq!(builder.config, LogConfig::default());
    }

    #[test]
    fn test_with_config_replaces_defaults() {
        let builder = HsnSubscriberBuilder::new().with_config(LogConfig::production("/tmp/hsn"));
        assert_eq!(builder.config.level, "info");
        assert!(builder.config.file.is_some());
    }
}

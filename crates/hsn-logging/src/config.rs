//! Where webhook logs go and what each line carries

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name prefix for the JSONL sink
pub const DEFAULT_FILE_PREFIX: &str = "hsn-webhook";

/// Logging settings for one webhook process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub console: ConsoleOutput,
    /// JSONL file sink; off unless a log directory is configured
    pub file: Option<FileConfig>,
    pub fields: EventFields,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleOutput::Json,
            file: None,
            fields: EventFields::default(),
        }
    }
}

impl LogConfig {
    /// JSONL on the console plus a daily JSONL file under `log_dir`
    pub fn production(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileConfig::new(log_dir)),
            ..Self::default()
        }
    }
}

/// Console sink format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleOutput {
    Off,
    /// One JSON object per line, for log shippers
    #[default]
    Json,
    /// Human-readable text, colored when stdout is a terminal
    Pretty,
}

/// JSONL file sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub rotation: FileRotation,
}

impl FileConfig {
    /// Daily-rotated `hsn-webhook.*` files in `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            rotation: FileRotation::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRotation {
    #[default]
    Daily,
    Hourly,
    /// A single `<prefix>.log`, truncated at startup
    Never,
}

/// Extra fields on JSON lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    /// Every enclosing span, not only the innermost `span`
    pub span_list: bool,
    /// Source file and line of the event
    pub source_location: bool,
}

impl Default for EventFields {
    fn default() -> Self {
        Self {
            span_list: true,
            source_location: false,
        }
    }
}

//! Command-line and environment configuration

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use hsn_core::IndexColumns;
use hsn_logging::{ConsoleOutput, LogConfig};

use crate::error::ConfigError;

/// Default Gemini `generateContent` endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "hsn-webhook",
    about = "HSN code lookup webhook for Dialogflow and Actions on Google"
)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HSN_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// HSN master data (.xlsx, .xls, .ods or .json)
    #[arg(long, env = "HSN_DATA_PATH", default_value = "HSN_Master_Data.xlsx")]
    pub data: PathBuf,

    /// Header of the code column
    #[arg(long, env = "HSN_CODE_COLUMN", default_value = "HSNCode")]
    pub code_column: String,

    /// Header of the description column
    #[arg(long, env = "HSN_DESCRIPTION_COLUMN", default_value = "Description")]
    pub description_column: String,

    /// Gemini API key; the conversational fallback is disabled without one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini generateContent endpoint
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_GEMINI_ENDPOINT)]
    pub gemini_endpoint: String,

    /// Timeout for fallback requests, in seconds
    #[arg(long, env = "HSN_FALLBACK_TIMEOUT_SECS", default_value_t = 15)]
    pub fallback_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HSN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Console log format
    #[arg(long, env = "HSN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Also write JSONL logs, rotated daily, into this directory
    #[arg(long, env = "HSN_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Conversational fallback settings
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// `None` disables the fallback
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Validated service configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub bind_addr: SocketAddr,
    pub data_path: PathBuf,
    pub columns: IndexColumns,
    pub fallback: FallbackConfig,
    pub logging: LogConfig,
}

impl Cli {
    /// Validate arguments into a [`WebhookConfig`]
    pub fn into_config(self) -> Result<WebhookConfig, ConfigError> {
        let code_column = self.code_column.trim().to_string();
        if code_column.is_empty() {
            return Err(ConfigError::EmptyColumn("code"));
        }
        let description_column = self.description_column.trim().to_string();
        if description_column.is_empty() {
            return Err(ConfigError::EmptyColumn("description"));
        }
        if self.fallback_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut logging = match self.log_dir {
            Some(dir) => LogConfig::production(dir),
            None => LogConfig::default(),
        };
        logging.level = self.log_level;
        logging.console = match self.log_format {
            LogFormat::Pretty => ConsoleOutput::Pretty,
            LogFormat::Json => ConsoleOutput::Json,
        };

        Ok(WebhookConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            data_path: self.data,
            columns: IndexColumns::new(code_column, description_column),
            fallback: FallbackConfig {
                api_key: self
                    .gemini_api_key
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty()),
                endpoint: self.gemini_endpoint,
                timeout: Duration::from_secs(self.fallback_timeout_secs),
            },
            logging,
        })
    }
}

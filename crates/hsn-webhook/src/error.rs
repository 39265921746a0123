//! Error types for the webhook service

use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors loading the tabular source at startup
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be opened or decoded
    #[error("Failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Workbook has no worksheets
    #[error("Workbook {0} has no worksheets")]
    EmptyWorkbook(PathBuf),

    /// JSON export is not an array of objects
    #[error("Malformed JSON records in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File extension is not a known tabular format
    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors from the conversational fallback service.
///
/// These never reach a webhook caller; see
/// [`reply_or_apology`](crate::fallback::reply_or_apology).
#[derive(Debug, Error)]
pub enum FallbackError {
    /// No API key configured
    #[error("Conversational fallback is not configured")]
    NotConfigured,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Request failed before a response arrived (connect, TLS, timeout)
    #[error("Fallback request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("Fallback service returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("Malformed fallback response: {0}")]
    MalformedBody(String),
}

/// Result type for fallback operations
pub type FallbackResult<T> = Result<T, FallbackError>;

/// Errors in command-line / environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A column header name was blank
    #[error("The {0} column name must not be empty")]
    EmptyColumn(&'static str),

    /// Fallback timeout of zero seconds
    #[error("Fallback timeout must be at least one second")]
    ZeroTimeout,
}

/// Errors surfaced to webhook callers
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body was not a JSON webhook payload
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[from] JsonRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::InvalidPayload(rejection) => rejection.status(),
        };
        let status = if status.is_client_error() {
            status
        } else {
            StatusCode::BAD_REQUEST
        };

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

//! Per-request correlation context
//!
//! Async handlers hop between worker threads, so the request identity is
//! carried on a tracing span rather than in thread-local storage. Every event
//! emitted while the span is entered picks up `request_id` and `platform`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Span;
use uuid::Uuid;

/// Identity of one inbound webhook request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique id for this request
    pub request_id: Uuid,
    /// Caller platform, e.g. `dialogflow` or `actions`
    pub platform: String,
    /// When the request was received
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Start the context for a request.
    ///
    /// `caller_id` is the id the caller already assigned (an `X-Request-Id`
    /// header); it is kept when it is a UUID, otherwise a fresh one is drawn.
    pub fn new(caller_id: Option<&str>, platform: impl Into<String>) -> Self {
        let request_id = caller_id
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
            .unwrap_or_else(Uuid::new_v4);

        Self {
            request_id,
            platform: platform.into(),
            received_at: Utc::now(),
        }
    }

    /// Span to instrument the request's handling with
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "webhook_request",
            request_id = %self.request_id,
            platform = %self.platform,
        )
    }

    /// Milliseconds since the request was received
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.received_at).num_milliseconds()
    }
}

//! Conversational fallback
//!
//! When a request carries no candidate code at all, the user is probably
//! chatting rather than asking for a lookup, so the message is handed to a
//! generative model. This is the only fallible collaborator in the request
//! path; [`reply_or_apology`] is the boundary where its errors stop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FallbackConfig;
use crate::error::{FallbackError, FallbackResult};

/// Sent to the caller whenever the fallback fails
pub const APOLOGY_REPLY: &str = "⚠️ Sorry, I couldn't understand that right now.";

/// Sent when the model answers but produces no text
pub const EMPTY_REPLY: &str = "🤖 I didn't quite get that.";

/// Free-form reply generation for messages without a code
#[async_trait]
pub trait ConversationalFallback: Send + Sync {
    /// Produce a reply to `user_text`
    async fn generate_reply(&self, user_text: &str) -> FallbackResult<String>;
}

/// Ask `fallback` for a reply, substituting [`APOLOGY_REPLY`] on any failure
pub async fn reply_or_apology(fallback: &dyn ConversationalFallback, user_text: &str) -> String {
    match fallback.generate_reply(user_text).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Conversational fallback failed");
            APOLOGY_REPLY.to_string()
        }
    }
}

/// Build the fallback described by `config`: Gemini when a key is set,
/// otherwise [`DisabledFallback`]
pub fn from_config(config: &FallbackConfig) -> FallbackResult<Arc<dyn ConversationalFallback>> {
    match &config.api_key {
        Some(api_key) => Ok(Arc::new(GeminiFallback::new(
            config.endpoint.clone(),
            api_key.clone(),
            config.timeout,
        )?)),
        None => {
            warn!("No Gemini API key configured; conversational fallback disabled");
            Ok(Arc::new(DisabledFallback))
        }
    }
}

/// Fallback that always fails with [`FallbackError::NotConfigured`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFallback;

#[async_trait]
impl ConversationalFallback for DisabledFallback {
    async fn generate_reply(&self, _user_text: &str) -> FallbackResult<String> {
        Err(FallbackError::NotConfigured)
    }
}

// Gemini generateContent wire types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if non-empty
    fn first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Google Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiFallback {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiFallback {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> FallbackResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FallbackError::Client(e.to_string()))?;

        Ok(Self::with_client(client, endpoint, api_key))
    }

    /// Use an already configured HTTP client
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Prompt sent for a user message
    pub fn prompt(user_text: &str) -> String {
        format!("You are a helpful assistant. User said: \"{user_text}\"")
    }
}

#[async_trait]
impl ConversationalFallback for GeminiFallback {
    async fn generate_reply(&self, user_text: &str) -> FallbackResult<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: Self::prompt(user_text),
                }],
            }],
        };

        // `without_url` keeps the API key in the query string out of logs
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| FallbackError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackError::Status(status.as_u16()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FallbackError::MalformedBody(e.without_url().to_string()))?;

        match body.first_text() {
            Some(text) => Ok(text),
            None => {
                debug!("Fallback response carried no text");
                Ok(EMPTY_REPLY.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReply(&'static str);

    #[async_trait]
    impl ConversationalFallback for FixedReply {
        async fn generate_reply(&self, _user_text: &str) -> FallbackResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_prompt() {
        assert_eq!(
            GeminiFallback::prompt("hi"),
            "You are a helpful assistant. User said: \"hi\""
        );
    }

    #[test]
    fn test_first_text() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello!"},{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.first_text().as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_first_text_missing_or_empty() {
        for raw in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            let body: GenerateContentResponse = serde_json::from_str(raw).unwrap();
            assert!(body.first_text().is_none(), "expected no text for {raw}");
        }
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hi".to_string(),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[tokio::test]
    async fn test_reply_passes_through() {
        let reply = reply_or_apology(&FixedReply("Namaste!"), "hello").await;
        assert_eq!(reply, "Namaste!");
    }

    #[tokio::test]
    async fn test_failure_becomes_apology() {
        let reply = reply_or_apology(&DisabledFallback, "hello").await;
        assert_eq!(reply, APOLOGY_REPLY);
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let fallback = from_config(&FallbackConfig::default()).unwrap();
        let result = tokio_test::block_on(fallback.generate_reply("hello"));
        assert!(matches!(result, Err(FallbackError::NotConfigured)));
    }
}

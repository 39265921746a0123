//! Webhook request and response payloads
//!
//! Two callers share the endpoint: Dialogflow fulfillment (identified by a
//! `queryResult` object) and Actions on Google conversation webhooks
//! (`inputs[].rawInputs[]`). Every field is optional so partial payloads
//! still produce a reply.

use hsn_core::extract_candidates;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Dialogflow parameter holding the code exactly as the user typed it, with
/// leading zeros intact
pub const ORIGINAL_CODE_PARAMETER: &str = "hsn-code.original";

/// Which assistant platform sent the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dialogflow,
    Actions,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Dialogflow => "dialogflow",
            Platform::Actions => "actions",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
    #[serde(default)]
    pub inputs: Option<Vec<ConversationInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationInput {
    #[serde(default)]
    pub raw_inputs: Option<Vec<RawInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub query: Option<String>,
}

impl WebhookRequest {
    pub fn platform(&self) -> Platform {
        if self.query_result.is_some() {
            Platform::Dialogflow
        } else {
            Platform::Actions
        }
    }

    /// The user's utterance: the first raw input query, else Dialogflow's
    /// `queryText`, else empty
    pub fn user_text(&self) -> &str {
        let raw_query = self
            .inputs
            .as_deref()
            .and_then(|inputs| inputs.first())
            .and_then(|input| input.raw_inputs.as_deref())
            .and_then(|raw| raw.first())
            .and_then(|raw| raw.query.as_deref())
            .filter(|query| !query.is_empty());

        let query_text = self
            .query_result
            .as_ref()
            .and_then(|result| result.query_text.as_deref());

        raw_query.or(query_text).unwrap_or_default()
    }

    /// Values of the [`ORIGINAL_CODE_PARAMETER`] parameter.
    ///
    /// Accepts a string, a number, or a list of either; blanks are dropped.
    pub fn original_codes(&self) -> Vec<String> {
        let Some(value) = self
            .query_result
            .as_ref()
            .and_then(|result| result.parameters.as_ref())
            .and_then(|params| params.get(ORIGINAL_CODE_PARAMETER))
        else {
            return Vec::new();
        };

        match value {
            Value::Array(items) => items.iter().filter_map(parameter_text).collect(),
            other => parameter_text(other).into_iter().collect(),
        }
    }

    /// Candidate codes for this request, in discovery order.
    ///
    /// The original-value parameter wins when present; otherwise every 2 to 8
    /// digit run in the user text is a candidate.
    pub fn candidates(&self) -> Vec<String> {
        let original = self.original_codes();
        if !original.is_empty() {
            return original;
        }
        extract_candidates(self.user_text())
    }
}

fn parameter_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Numeric entities often arrive as floats (`8471.0`); a whole value must not
/// grow an extra `0` digit once cleaned.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Reply in the envelope the calling platform expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookResponse {
    Dialogflow {
        #[serde(rename = "fulfillmentText")]
        fulfillment_text: String,
    },
    Actions {
        prompt: Prompt,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    #[serde(rename = "firstSimple")]
    pub first_simple: SimpleResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub speech: String,
    pub text: String,
}

impl WebhookResponse {
    pub fn for_platform(platform: Platform, text: impl Into<String>) -> Self {
        let text = text.into();
        match platform {
            Platform::Dialogflow => WebhookResponse::Dialogflow {
                fulfillment_text: text,
            },
            Platform::Actions => WebhookResponse::Actions {
                prompt: Prompt {
                    first_simple: SimpleResponse {
                        speech: text.clone(),
                        text,
                    },
                },
            },
        }
    }

    /// The reply text, whichever envelope carries it
    pub fn text(&self) -> &str {
        match self {
            WebhookResponse::Dialogflow { fulfillment_text } => fulfillment_text,
            WebhookResponse::Actions { prompt } => &prompt.first_simple.text,
        }
    }
}

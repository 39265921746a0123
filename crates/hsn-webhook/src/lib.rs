//! # HSN Webhook
//!
//! Conversational-assistant webhook that explains HSN codes.
//!
//! At startup the master data sheet is loaded into an immutable
//! [`CodeIndex`](hsn_core::CodeIndex). Each `POST /webhook` call pulls
//! candidate codes out of the Dialogflow or Actions on Google payload,
//! resolves each one against the index, and replies with the matched
//! hierarchy. Messages without any code are answered by a
//! [`ConversationalFallback`].

pub mod config;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod payload;
pub mod render;
pub mod server;

pub use config::{Cli, FallbackConfig, LogFormat, WebhookConfig};
pub use error::{ConfigError, FallbackError, LoadError, WebhookError};
pub use fallback::{ConversationalFallback, DisabledFallback, GeminiFallback};
pub use payload::{Platform, WebhookRequest, WebhookResponse};
pub use server::{build_router, handle_webhook, AppState, REQUEST_ID_HEADER};

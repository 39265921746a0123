//! HTTP surface: router, shared state, and handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hsn_core::{resolve_all, CodeIndex};
use hsn_logging::RequestContext;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, Instrument};

use crate::error::WebhookError;
use crate::fallback::{reply_or_apology, ConversationalFallback};
use crate::payload::{WebhookRequest, WebhookResponse};
use crate::render::render_outcomes;

/// Correlation header read from callers and echoed on webhook replies
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared by every request.
///
/// The index is built before the router exists and is never written again,
/// so handlers read it through the `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<CodeIndex>,
    pub fallback: Arc<dyn ConversationalFallback>,
}

impl AppState {
    pub fn new(index: Arc<CodeIndex>, fallback: Arc<dyn ConversationalFallback>) -> Self {
        Self { index, fallback }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/healthz", get(healthz_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Answer one webhook request.
///
/// Resolves every candidate code in order; with no candidates at all the
/// user text goes to the conversational fallback instead.
pub async fn handle_webhook(state: &AppState, request: &WebhookRequest) -> WebhookResponse {
    let platform = request.platform();
    let candidates = request.candidates();

    if candidates.is_empty() {
        debug!("No candidate codes; using conversational fallback");
        let reply = reply_or_apology(state.fallback.as_ref(), request.user_text()).await;
        return WebhookResponse::for_platform(platform, reply);
    }

    let outcomes = resolve_all(&candidates, &state.index);
    info!(
        candidates = ?candidates,
        found = outcomes.iter().filter(|outcome| outcome.is_found()).count(),
        "Resolved candidate codes"
    );

    WebhookResponse::for_platform(platform, render_outcomes(&outcomes))
}

async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<Response, WebhookError> {
    let Json(request) = payload?;
    let caller_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let ctx = RequestContext::new(caller_id, request.platform().as_str());

    let response = handle_webhook(&state, &request)
        .instrument(ctx.span())
        .await;

    debug!(
        request_id = %ctx.request_id,
        elapsed_ms = ctx.elapsed_ms(),
        "Webhook handled"
    );
    let request_id = ctx.request_id.to_string();
    Ok(([(REQUEST_ID_HEADER, request_id)], Json(response)).into_response())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    indexed_codes: usize,
}

async fn healthz_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        indexed_codes: state.index.len(),
    })
}

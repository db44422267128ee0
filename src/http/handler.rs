//! Chat endpoint handlers.
//!
//! A chat request moves through fixed stages, each of which may end it:
//!
//! ```text
//! OPTIONS                      → 200, empty body
//! POST → parse body            → BadRequest
//!      → resolve credentials   → Configuration
//!      → load goals            → absorbed or GoalLookup, per policy
//!      → compose prompt
//!      → call upstream         → Upstream / MalformedResponse / Transport
//!      → 200 {"response": ...}
//! ```
//!
//! Nothing is kept between requests. The configuration snapshot is read once
//! at the start of each request.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ChatError;
use crate::http::request::ChatRequest;
use crate::http::response::{ChatReply, HealthStatus};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::prompt;
use crate::security::limits;

/// `POST /chat`.
pub async fn chat(State(state): State<AppState>, body: Body) -> Response {
    let start = Instant::now();

    match handle_chat(&state, body).await {
        Ok(reply) => {
            metrics::record_request("success", start);
            tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Chat request completed"
            );
            reply.into_response()
        }
        Err(e) => {
            metrics::record_request(e.kind(), start);
            tracing::error!(kind = e.kind(), error = %e, "Chat request failed");
            e.into_response()
        }
    }
}

async fn handle_chat(state: &AppState, body: Body) -> Result<ChatReply, ChatError> {
    let config = state.config.load_full();

    let bytes = limits::read_body(body, config.listener.max_body_bytes).await?;
    let request = ChatRequest::from_slice(&bytes)?;
    let credentials = config.credentials()?;

    tracing::debug!(
        has_user = request.user_id.is_some(),
        message_len = request.message.len(),
        "Chat request accepted"
    );

    let lookup = state
        .goals
        .load(&credentials.store, request.user_id.as_deref())
        .await;
    let goals = config.store.goal_lookup.apply(lookup)?;

    let prompt = prompt::compose(&goals, &request.message);
    let response = state
        .generator
        .generate(&credentials.upstream, &prompt)
        .await?;

    Ok(ChatReply { response })
}

/// `OPTIONS /chat`: CORS preflight. Headers come from the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// `GET /health`.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

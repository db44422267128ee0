//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Decode and validate the chat request body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body is decoded by hand so malformed input shares the JSON error path

use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ChatError;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the correlation ID of a request, if one was assigned.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequestBody {
    message: Option<String>,
    user_id: Option<String>,
}

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    /// Present only when the caller sent a non-empty id.
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Decode a JSON body of the form `{"message": "...", "userId": "..."}`.
    pub fn from_slice(body: &[u8]) -> Result<Self, ChatError> {
        let raw: ChatRequestBody = serde_json::from_slice(body)
            .map_err(|e| ChatError::BadRequest(format!("malformed JSON body: {}", e)))?;

        let message = raw
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ChatError::BadRequest("message is required".into()))?;

        Ok(Self {
            message,
            user_id: raw.user_id.filter(|id| !id.is_empty()),
        })
    }
}

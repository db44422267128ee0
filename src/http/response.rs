//! Response shapes.
//!
//! Success is `200 {"response": text}`; failures render through
//! [`crate::error::ChatError`] as `500 {"error": message}`. CORS headers are
//! added by the outer layer, not here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON body of a successful chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

impl IntoResponse for ChatReply {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// JSON body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

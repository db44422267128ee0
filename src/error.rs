//! Error taxonomy for the chat proxy.
//!
//! Every terminal failure of a chat request is a [`ChatError`]. Goal lookup
//! failures have their own type because the handler may absorb them, see
//! [`crate::goals::GoalLookupPolicy`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while resolving a user's goals from the backing store.
#[derive(Debug, Error)]
pub enum GoalLookupError {
    /// The store could not be reached.
    #[error("goal store unreachable: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("goal store returned status {0}")]
    Status(u16),

    /// The store answered with a body we could not decode.
    #[error("goal store returned an unreadable body: {0}")]
    Decode(String),
}

/// Errors that terminate a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A required credential or endpoint is missing.
    #[error("{0}")]
    Configuration(String),

    /// The inbound body was malformed or had no usable message.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Goal lookup failed and the policy says to fail the request.
    #[error("Failed to load user goals: {0}")]
    GoalLookup(#[from] GoalLookupError),

    /// The generation API answered with a non-success status.
    #[error("API request failed: {status}")]
    Upstream { status: u16 },

    /// The generation API answered 2xx but without candidate text.
    #[error("Invalid response format from Gemini API")]
    MalformedResponse,

    /// The generation API could not be reached.
    #[error("API request failed: {0}")]
    Transport(String),
}

impl ChatError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Configuration(_) => "configuration",
            ChatError::BadRequest(_) => "bad_request",
            ChatError::GoalLookup(_) => "goal_lookup",
            ChatError::Upstream { .. } => "upstream",
            ChatError::MalformedResponse => "malformed_response",
            ChatError::Transport(_) => "transport",
        }
    }

    /// HTTP status reported to the caller.
    ///
    /// Every failure maps to 500, including caller input errors. Browser
    /// clients built against this endpoint only distinguish 200 from non-200.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// JSON body of a failed chat request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

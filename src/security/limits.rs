//! Request size limits.

use axum::body::{Body, Bytes};

use crate::error::ChatError;

/// Buffer a request body, refusing anything larger than `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, ChatError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ChatError::BadRequest(format!("unreadable request body: {}", e)))
}

//! Upstream generation subsystem.
//!
//! # Data Flow
//! ```text
//! composed prompt + UpstreamTarget
//!     → gemini.rs (one POST to generateContent, fixed config + safety)
//!     → first candidate text, or ChatError
//! ```
//!
//! # Design Decisions
//! - Exactly one round trip per message: no retries, no streaming
//! - Only a transport connect timeout; no request deadline
//! - Error bodies are logged, never returned to the caller

pub mod gemini;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{UpstreamConfig, UpstreamTarget};
use crate::error::ChatError;

pub use gemini::GeminiClient;

/// Produces the assistant reply for a composed prompt.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, target: &UpstreamTarget, prompt: &str) -> Result<String, ChatError>;
}

/// HTTP client shared by the outbound collaborators.
pub fn http_client(config: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder =
        reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
    if !config.system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}

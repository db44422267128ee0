//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::goals::GoalLookupPolicy;

/// Root configuration for the chat proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Generation API settings.
    pub upstream: UpstreamConfig,

    /// Goal store settings.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Generation API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the API, without the `/models/...` suffix.
    pub api_url: String,

    /// Model name used in the `generateContent` path.
    pub model: String,

    /// API credential. Usually supplied through `GEMINI_API_KEY`.
    pub api_key: Option<String>,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for outbound calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            connect_timeout_secs: 10,
            system_proxy: true,
        }
    }
}

/// Goal store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL of the store (e.g., "https://xyz.supabase.co").
    pub url: Option<String>,

    /// Service credential. Usually supplied through `SUPABASE_SERVICE_ROLE_KEY`.
    pub service_key: Option<String>,

    /// What to do when the goal lookup fails.
    pub goal_lookup: GoalLookupPolicy,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Where and how to reach the generation API for one request.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    pub endpoint: String,
    pub api_key: String,
}

/// Where and how to reach the goal store for one request.
#[derive(Debug, Clone)]
pub struct StoreTarget {
    pub url: String,
    pub service_key: String,
}

/// Everything a chat request needs from configuration.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub upstream: UpstreamTarget,
    pub store: StoreTarget,
}

impl UpstreamConfig {
    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Resolve the upstream target, failing if no API key is configured.
    pub fn target(&self) -> Result<UpstreamTarget, ChatError> {
        let api_key = non_empty(self.api_key.as_deref())
            .ok_or_else(|| ChatError::Configuration("Gemini API key not configured".into()))?;
        Ok(UpstreamTarget {
            endpoint: self.endpoint(),
            api_key: api_key.to_string(),
        })
    }
}

impl StoreConfig {
    /// Resolve the store target, failing if the URL or key is missing.
    pub fn target(&self) -> Result<StoreTarget, ChatError> {
        match (non_empty(self.url.as_deref()), non_empty(self.service_key.as_deref())) {
            (Some(url), Some(key)) => Ok(StoreTarget {
                url: url.to_string(),
                service_key: key.to_string(),
            }),
            _ => Err(ChatError::Configuration(
                "Supabase configuration missing".into(),
            )),
        }
    }
}

impl ServiceConfig {
    /// Resolve both credentials. The API key is checked first.
    pub fn credentials(&self) -> Result<Credentials, ChatError> {
        let upstream = self.upstream.target()?;
        let store = self.store.target()?;
        Ok(Credentials { upstream, store })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

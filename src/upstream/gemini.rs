//! Gemini `generateContent` client.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{UpstreamConfig, UpstreamTarget};
use crate::error::ChatError;
use crate::observability::metrics;
use crate::upstream::{http_client, ReplyGenerator};

const API_KEY_HEADER: &str = "X-goog-api-key";
const BLOCK_MEDIUM_AND_ABOVE: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Client for the generation API.
#[derive(Clone, Default)]
pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client with the configured connect timeout.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(http_client(config)?))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: BLOCK_MEDIUM_AND_ABOVE,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull `candidates[0].content.parts[0].text` out of a success body.
pub(crate) fn extract_text(body: &[u8]) -> Result<String, ChatError> {
    let parsed: GenerateContentResponse =
        serde_json::from_slice(body).map_err(|_| ChatError::MalformedResponse)?;

    parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(ChatError::MalformedResponse)
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    async fn generate(&self, target: &UpstreamTarget, prompt: &str) -> Result<String, ChatError> {
        let start = Instant::now();
        let body = GenerateContentRequest::new(prompt);

        let response = self
            .client
            .post(&target.endpoint)
            .header(API_KEY_HEADER, target.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Generation API unreachable");
                ChatError::Transport(e.to_string())
            })?;

        let status = response.status();
        metrics::record_upstream(status.as_u16(), start);

        if !status.is_success() {
            let details = response.json::<serde_json::Value>().await.ok();
            tracing::error!(
                status = status.as_u16(),
                details = ?details,
                "Generation API returned an error"
            );
            return Err(ChatError::Upstream {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let text = extract_text(&bytes)?;

        tracing::debug!(
            prompt_len = prompt.len(),
            reply_len = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generation API replied"
        );
        Ok(text)
    }
}

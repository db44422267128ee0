//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mindful_chat_proxy::config::{ServiceConfig, StoreTarget, UpstreamTarget};
use mindful_chat_proxy::goals::{Goal, GoalStore};
use mindful_chat_proxy::upstream::ReplyGenerator;
use mindful_chat_proxy::{ChatError, ChatServer, GoalLookupError, Shutdown};

/// A request seen by a mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Counts and remembers requests hitting a mock server.
#[derive(Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<Recorded>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Recorded> {
        self.last.lock().unwrap().clone()
    }

    async fn capture(&self, request: Request) {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(Recorded {
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body: body.to_vec(),
        });
    }
}

/// A mock HTTP server answering every request with `status` and `body`.
pub async fn start_mock_server(recorder: Recorder, status: StatusCode, body: Value) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request| {
        let recorder = recorder.clone();
        let body = body.clone();
        async move {
            recorder.capture(request).await;
            (status, Json(body))
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A generation API success body carrying `text`.
pub fn candidate(text: &str) -> Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    })
}

/// Configuration pointing at mock upstream and store servers.
pub fn config_for(upstream: SocketAddr, store: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.api_url = format!("http://{}/v1beta", upstream);
    config.upstream.api_key = Some("test-api-key".into());
    config.upstream.system_proxy = false;
    config.store.url = Some(format!("http://{}", store));
    config.store.service_key = Some("test-service-key".into());
    config
}

/// Start the real proxy on an ephemeral port.
pub async fn start_proxy(
    config: ServiceConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<ServiceConfig>) {
    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let server = ChatServer::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, updates_tx)
}

/// In-memory goal store.
pub struct FakeStore {
    pub calls: AtomicUsize,
    pub goals: Result<Vec<Goal>, u16>,
}

impl FakeStore {
    pub fn with_goals(goals: Vec<Goal>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            goals: Ok(goals),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            goals: Err(status),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GoalStore for FakeStore {
    async fn fetch_goals(&self, _target: &StoreTarget, _user_id: &str) -> Result<Vec<Goal>, GoalLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.goals {
            Ok(goals) => Ok(goals.clone()),
            Err(status) => Err(GoalLookupError::Status(*status)),
        }
    }
}

/// What the fake generator answers.
pub enum Outcome {
    Reply(&'static str),
    Status(u16),
    Malformed,
}

/// Generator that records prompts instead of calling out.
pub struct FakeGenerator {
    pub outcome: Outcome,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyGenerator for FakeGenerator {
    async fn generate(&self, _target: &UpstreamTarget, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.outcome {
            Outcome::Reply(text) => Ok(text.to_string()),
            Outcome::Status(status) => Err(ChatError::Upstream { status }),
            Outcome::Malformed => Err(ChatError::MalformedResponse),
        }
    }
}

/// Collect a response body as JSON.
pub async fn body_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

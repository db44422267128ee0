//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS)
//! - Swap in reloaded configuration
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::goals::{GoalLoader, GoalStore, PostgrestGoalStore};
use crate::http::handler::{chat, health, preflight};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::security::headers::with_cors;
use crate::upstream::{http_client, GeminiClient, ReplyGenerator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<ServiceConfig>>,
    pub goals: GoalLoader,
    pub generator: Arc<dyn ReplyGenerator>,
}

/// HTTP server for the chat proxy.
pub struct ChatServer {
    router: Router,
    config: Arc<ArcSwap<ServiceConfig>>,
}

impl ChatServer {
    /// Create a server with explicit goal store and generator implementations.
    pub fn new(
        config: ServiceConfig,
        store: Arc<dyn GoalStore>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        let config = Arc::new(ArcSwap::from_pointee(config));
        let state = AppState {
            config: config.clone(),
            goals: GoalLoader::new(store),
            generator,
        };

        Self {
            router: Self::build_router(state),
            config,
        }
    }

    /// Create a server talking to the configured store and generation API.
    pub fn from_config(config: ServiceConfig) -> Result<Self, reqwest::Error> {
        let store = Arc::new(PostgrestGoalStore::new(http_client(&config.upstream)?));
        let generator = Arc::new(GeminiClient::from_config(&config.upstream)?);

        Ok(Self::new(config, store, generator))
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let router = Router::new()
            .route("/chat", post(chat).options(preflight))
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                request_id = %request_id(request),
                                method = %request.method(),
                                path = %request.uri().path(),
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            );

        with_cors(router)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<ServiceConfig> {
        self.config.load_full()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the snapshot seen
    /// by subsequent requests. The listener itself is not rebound.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let snapshot = self.config.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                if new_config.listener.bind_address != snapshot.load().listener.bind_address {
                    tracing::warn!("listener.bind_address changed; takes effect on restart");
                }
                snapshot.store(Arc::new(new_config));
                tracing::info!("Configuration reloaded");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

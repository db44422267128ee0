//! Mental-health support chat proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     CHAT PROXY                        │
//!   Browser       │  ┌─────────┐   ┌──────────┐   ┌──────────────┐       │
//!   POST /chat ───┼─▶│  http   │──▶│  goals   │──▶│ goal store   │◀──────┼── PostgREST
//!                 │  │ handler │   │  loader  │   │ (one query)  │       │
//!                 │  └────┬────┘   └──────────┘   └──────────────┘       │
//!                 │       │                                               │
//!                 │       ▼                                               │
//!                 │  ┌─────────┐   ┌──────────────┐                       │
//!                 │  │ prompt  │──▶│   upstream   │◀──────────────────────┼── Gemini API
//!                 │  │ compose │   │ generateCont.│                       │
//!                 │  └─────────┘   └──────────────┘                       │
//!   {"response"}  │                                                       │
//!   ◀─────────────┼── CORS layer on every response                       │
//!                 │                                                       │
//!                 │  config (file + env, hot reload) · observability ·   │
//!                 │  lifecycle (signals, graceful shutdown)              │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use mindful_chat_proxy::config::watcher::ConfigWatcher;
use mindful_chat_proxy::lifecycle::{signals, startup};
use mindful_chat_proxy::observability::{logging, metrics};
use mindful_chat_proxy::{ChatServer, Shutdown};

#[derive(Parser)]
#[command(name = "mindful-chat-proxy")]
#[command(about = "Chat proxy between the browser and the generation API", long_about = None)]
struct Args {
    /// TOML configuration file. Credentials may also come from the environment.
    #[arg(short, long, env = "MINDFUL_CONFIG")]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load(args.config.as_deref())?;
    logging::init_logging(&config.observability.log_level);

    tracing::info!("mindful-chat-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model = %config.upstream.model,
        goal_lookup = ?config.store.goal_lookup,
        "Configuration loaded"
    );
    startup::report_credentials(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match args.config.as_deref() {
        Some(path) if args.watch => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = startup::bind(&config).await?;
    let server = ChatServer::from_config(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

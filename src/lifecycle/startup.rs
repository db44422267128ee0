//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Report missing credentials before traffic arrives
//! - Bind the listener last, once everything else is ready

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::loader::{load_config_with_env, ConfigError};
use crate::config::ServiceConfig;

/// Load configuration from an optional file and the process environment.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Log whether chat requests can succeed with this configuration.
///
/// Missing credentials do not stop the process: every chat request fails
/// with a configuration error until a reload supplies them.
pub fn report_credentials(config: &ServiceConfig) -> bool {
    match config.credentials() {
        Ok(_) => {
            tracing::info!("Upstream and store credentials present");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Chat requests will fail until configuration is fixed");
            false
        }
    }
}

/// Bind the configured listener address.
pub async fn bind(config: &ServiceConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}

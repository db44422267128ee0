//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the generation API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable carrying the store project URL.
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
/// Environment variable carrying the store service credential.
pub const ENV_STORE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// Environment variable overriding the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "MINDFUL_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from an optional file, then apply environment overrides.
///
/// Without a file the defaults are used. Validation runs after the overrides.
pub fn load_config_with_env<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay credentials and the bind address from environment-style lookups.
///
/// Empty values are ignored so an unset-but-exported variable does not wipe a
/// value from the file.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_API_KEY) {
        config.upstream.api_key = Some(key);
    }
    if let Some(url) = get(ENV_STORE_URL) {
        config.store.url = Some(url);
    }
    if let Some(key) = get(ENV_STORE_KEY) {
        config.store.service_key = Some(key);
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}

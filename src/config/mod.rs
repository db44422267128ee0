//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + environment
//!     → loader.rs (parse, deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via ArcSwap with the chat handler
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the snapshot
//!     → the next request observes the new config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Credentials are checked per request, not at load time

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    Credentials, ListenerConfig, ObservabilityConfig, ServiceConfig, StoreConfig, StoreTarget,
    UpstreamConfig, UpstreamTarget,
};

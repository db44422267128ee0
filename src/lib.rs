//! Mental-health support chat proxy.
//!
//! Accepts a chat message, resolves the user's personalization goals from the
//! goal store, composes a supportive system prompt and relays the generation
//! API's reply.

// Core
pub mod error;
pub mod goals;
pub mod http;
pub mod prompt;
pub mod upstream;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use error::{ChatError, GoalLookupError};
pub use http::ChatServer;
pub use lifecycle::Shutdown;

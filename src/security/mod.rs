//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (cap the body before parsing)
//!     → handler
//! Outgoing response (every route, every status):
//!     → headers.rs (CORS header set)
//! ```
//!
//! # Design Decisions
//! - CORS headers are a response layer, never set by individual handlers
//! - Oversized bodies are caller errors and share the JSON error path

pub mod headers;
pub mod limits;

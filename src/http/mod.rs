//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID, parse ChatRequest)
//!     → handler.rs (goals → prompt → upstream)
//!     → response.rs (ChatReply / error JSON)
//!     → security::headers (CORS on every response)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ChatRequest, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ChatReply;
pub use server::{AppState, ChatServer};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Prompts and credentials are never logged, only their sizes
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

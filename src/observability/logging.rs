//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and to the tower-http trace layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a log level.
pub fn default_directive(level: &str) -> String {
    format!("mindful_chat_proxy={level},tower_http={level}")
}

/// Install the global tracing subscriber.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("debug"),
            "mindful_chat_proxy=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("info");
        init_logging("debug");
    }
}

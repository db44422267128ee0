//! Metrics collection and exposition.
//!
//! # Metrics
//! - `chat_requests_total` (counter): chat requests by outcome
//! - `chat_request_duration_seconds` (histogram): end-to-end handler latency
//! - `chat_upstream_duration_seconds` (histogram): generation API latency by status
//! - `chat_goal_lookup_failures_total` (counter): failed goal lookups

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished chat request.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("chat_requests_total", "outcome" => outcome).increment(1);
    histogram!("chat_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a generation API round trip.
pub fn record_upstream(status: u16, start: Instant) {
    histogram!("chat_upstream_duration_seconds", "status" => status.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_goal_lookup_failure() {
    counter!("chat_goal_lookup_failures_total").increment(1);
}

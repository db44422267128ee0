//! CORS response headers.
//!
//! Browsers call the chat endpoint cross-origin with the store's client
//! headers attached, so every response carries a permissive origin and the
//! allowed request header list. The headers are installed as an outer layer so
//! error paths, preflights and framework rejections all carry them.

use axum::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue,
    },
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Value of `Access-Control-Allow-Origin`.
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Headers`.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Wrap a router so every response carries the CORS header set.
pub fn with_cors(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

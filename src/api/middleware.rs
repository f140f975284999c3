//! Request latency tracking.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::record_http_latency;

/// Record per-route request latency.
///
/// Installed with `route_layer`, so the matched route template is always
/// present and unknown paths never reach the histogram.
pub async fn track_http_latency(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    record_http_latency(start, method.as_str(), &endpoint, response.status().as_u16());
    response
}

//! # HTTP Request Metrics Middleware
//!
//! Records request counts and latency per matched route. Span creation for
//! requests is left to tower-http's `TraceLayer`.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::observability::metrics;

/// Axum middleware that records `http_requests_total` and
/// `http_request_duration_seconds` for every request.
pub async fn record_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // Route templates keep label cardinality bounded.
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed();
    tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis(), "request completed");
    metrics::record_http_request(&method, &path, status, elapsed.as_secs_f64()).await;

    response
}

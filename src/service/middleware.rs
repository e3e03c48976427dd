//! Service middleware for metrics and request tracking.
//!
//! ## Metrics Exposed
//!
//! - `request` - Request count and latency by path pattern, method, status
//! - `embed` - Graph size, outcome and cache hit per planarity test

use std::sync::OnceLock;
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use regex_lite::Regex;
use tracing::info;

/// Metrics middleware that records request counts and latency.
///
/// Uses tracing for now; log-based aggregation picks up the
/// `planarity_kernel::metrics` target.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "planarity_kernel::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Replaces policy params hashes with a placeholder.
fn normalize_path(path: &str) -> String {
    static HASH_SEGMENT: OnceLock<Option<Regex>> = OnceLock::new();

    match HASH_SEGMENT.get_or_init(|| Regex::new(r"/[0-9a-f]{16}(/|$)").ok()) {
        Some(regex) => regex.replace_all(path, "/:params_hash$1").into_owned(),
        None => path.to_string(),
    }
}

/// Record planarity test metrics.
///
/// Call this after every test to track graph sizes and hit rates.
pub fn record_embed_metrics(vertices: usize, edges: usize, planar: bool, cache_hit: bool, latency_ms: u64) {
    info!(
        target: "planarity_kernel::metrics",
        metric_type = "embed",
        vertices = vertices,
        edges = edges,
        planar = planar,
        cache_hit = cache_hit,
        latency_ms = latency_ms,
        "embed_metric"
    );
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, method, status, outcome
//! - `proxy_request_duration_seconds` (histogram): time to response head, by route
//!
//! # Design Decisions
//! - Recording is always on; without an installed recorder it is a no-op
//! - The Prometheus exporter is opt-in through configuration
//! - Route labels come from the static route table, so cardinality is bounded
//! - Extension methods share one `other` label

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::Outcome;

/// Route label for requests that matched no route.
pub const UNROUTED: &str = "none";

/// Method label for anything outside the standard method set.
pub const OTHER_METHOD: &str = "other";

/// Bounded label for a request method.
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => OTHER_METHOD,
    }
}

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(
    route: &'static str,
    method: &Method,
    status: StatusCode,
    outcome: Outcome,
    start: Instant,
) {
    metrics::counter!(
        "proxy_requests_total",
        "route" => route,
        "method" => method_label(method),
        "status" => status.as_u16().to_string(),
        "outcome" => outcome.as_str(),
    )
    .increment(1);

    metrics::histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

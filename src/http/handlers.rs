//! Route handler: dispatch → forward → relay for one request.
//!
//! Every route in the table is served here; the descriptor picked by the
//! dispatcher supplies the target, header allow-list and relay mode.
//!
//! ```text
//! Received → MethodChecked → Rejected                (4xx, no upstream call)
//!                          → Forwarding → Relayed    (upstream status)
//!                                       → Failed     (502)
//! ```

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::error::{GatewayError, Outcome};
use crate::http::forwarder::{carries_body, read_inbound_body};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics::{self, UNROUTED};
use crate::routing::{Dispatch, RouteDescriptor};

/// Fallback handler for every inbound request.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let route = match state.routes.dispatch(&method, &path) {
        Dispatch::Matched(route) => route,
        Dispatch::MethodNotAllowed(allowed) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "Method not allowed");
            let err = GatewayError::MethodNotAllowed { allowed };
            metrics::record_request(UNROUTED, &method, err.status(), err.outcome(), start);
            return err.into_response();
        }
        Dispatch::NotFound => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            let err = GatewayError::NotFound;
            metrics::record_request(UNROUTED, &method, err.status(), err.outcome(), start);
            return err.into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        route = route.name,
        resource = %route.resource,
        relay = route.relay.as_str(),
        "Proxying request"
    );

    match forward(&state, route, request).await {
        Ok(response) => {
            tracing::debug!(request_id = %request_id, route = route.name, status = %response.status(), "Relaying response");
            metrics::record_request(route.name, &method, response.status(), Outcome::Relayed, start);
            response
        }
        Err(err) => {
            match err.outcome() {
                Outcome::Rejected => {
                    tracing::warn!(request_id = %request_id, route = route.name, error = %err, "Request rejected")
                }
                _ => tracing::error!(request_id = %request_id, route = route.name, error = %err, "Upstream error"),
            }
            metrics::record_request(route.name, &method, err.status(), err.outcome(), start);
            err.into_response()
        }
    }
}

/// Read the body if the method carries one, call the upstream once, relay.
async fn forward(
    state: &AppState,
    route: &RouteDescriptor,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let body = if carries_body(&parts.method) {
        Some(read_inbound_body(body).await?)
    } else {
        None
    };

    let outbound = state.forwarder.build_request(route, &parts, body)?;
    let upstream = state.forwarder.send(outbound).await?;
    route.relay.relay(upstream).await
}

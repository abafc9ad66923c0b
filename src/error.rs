//! Failure taxonomy and its mapping to client-visible statuses.
//!
//! | Failure                               | Status |
//! |---------------------------------------|--------|
//! | No route matches path                 | 404    |
//! | Route matches, method does not        | 405    |
//! | Inbound body unreadable               | 400    |
//! | Outbound request construction fails   | 502    |
//! | Upstream unreachable                  | 502    |
//! | Upstream body unreadable (buffered)   | 502    |
//!
//! Detail stays in the server log; clients get the canonical reason phrase.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a single proxied request can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no route matches the request path")]
    NotFound,

    #[error("method not allowed, route accepts {}", join_methods(.allowed))]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("failed to read request body: {0}")]
    InboundBody(#[source] axum::Error),

    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[source] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response body: {0}")]
    UpstreamBody(#[source] BoxError),
}

/// Terminal state of a proxied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Relayed the upstream response.
    Relayed,
    /// Refused before any upstream call.
    Rejected,
    /// Upstream side failed.
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Relayed => "relayed",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

impl GatewayError {
    /// Client-visible status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::InboundBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::BuildRequest(_)
            | GatewayError::Upstream(_)
            | GatewayError::UpstreamBody(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client input errors are rejected; gateway errors failed.
    pub fn outcome(&self) -> Outcome {
        if self.status().is_client_error() {
            Outcome::Rejected
        } else {
            Outcome::Failed
        }
    }
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        let mut response = (status, reason).into_response();

        if let GatewayError::MethodNotAllowed { allowed } = &self {
            if let Ok(value) = HeaderValue::from_str(&join_methods(allowed)) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}

//! Outbound request construction and execution.
//!
//! # Responsibilities
//! - Read write-method bodies fully into memory
//! - Resolve the upstream target URL for a route
//! - Copy only the route's allow-listed headers
//! - Send the request on the shared client
//!
//! # Design Decisions
//! - Single attempt: no retry, no timeout
//! - Construction and transport failures both surface as 502
//! - Connection pooling is whatever the hyper-util client does by default

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::uri::{Authority, Scheme};
use axum::http::{Method, Request, Response, Uri};
use bytes::Bytes;
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use url::Url;

use crate::config::ValidationError;
use crate::error::GatewayError;
use crate::routing::RouteDescriptor;

/// Returns true for methods whose inbound body is copied upstream.
pub fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Read the entire inbound body. No size cap.
pub async fn read_inbound_body(body: Body) -> Result<Bytes, GatewayError> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(GatewayError::InboundBody)
}

/// The fixed upstream base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
    /// Path prefix with no trailing slash; empty for a bare host.
    base_path: String,
}

impl Upstream {
    /// Parse a base URL such as `http://localhost:3000` or `http://backend/api`.
    pub fn parse(base_url: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::UpstreamUrl {
            url: base_url.to_string(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::try_from(authority.as_str())
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// Absolute upstream URI for a path-and-query relative to the base.
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(format!("{}{}", self.base_path, path_and_query))
            .build()
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.base_path)
    }
}

/// Builds and sends upstream requests.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    upstream: Upstream,
}

impl Forwarder {
    pub fn new(upstream: Upstream) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, upstream }
    }

    /// Construct the outbound request for `route`.
    ///
    /// `body` is `Some` only for methods that carry one.
    pub fn build_request(
        &self,
        route: &RouteDescriptor,
        inbound: &Parts,
        body: Option<Bytes>,
    ) -> Result<Request<Body>, GatewayError> {
        let uri = self
            .upstream
            .uri_for(route.target.resolve(&inbound.uri))
            .map_err(GatewayError::BuildRequest)?;

        let mut request = Request::builder()
            .method(inbound.method.clone())
            .uri(uri)
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(GatewayError::BuildRequest)?;

        route.forward.apply(&inbound.headers, request.headers_mut());
        Ok(request)
    }

    /// Execute a request against the upstream.
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Incoming>, GatewayError> {
        self.client
            .request(request)
            .await
            .map_err(GatewayError::Upstream)
    }
}

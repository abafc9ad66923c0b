//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

use storefront_proxy::config::ProxyConfig;
use storefront_proxy::http::HttpServer;
use storefront_proxy::lifecycle::Shutdown;

/// Spacing between events emitted by the mock event feeds.
pub const EVENT_INTERVAL: Duration = Duration::from_millis(200);

/// Body served for `/customer/order-history/bulk`.
pub const BULK_SIZE: usize = 100 * 1024;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    log: Log,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("backend received no request")
    }
}

/// Start a mock ordering backend on an ephemeral port.
///
/// - `POST /orders` → 201 with a JSON body
/// - `GET /auth/me` → two `Set-Cookie` values
/// - `GET /orders/missing` → 404
/// - `/customer/order-history/bulk` → 100 KiB body
/// - any path ending in `/stream` → three SSE events, `EVENT_INTERVAL` apart
/// - anything else → 200 `ok`
pub async fn start_mock_backend() -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::default();

    let app = Router::new().fallback(backend_handler).with_state(log.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, log }
}

async fn backend_handler(State(log): State<Log>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    log.lock().unwrap().push(Recorded {
        method: parts.method.clone(),
        uri: parts.uri.clone(),
        headers: parts.headers.clone(),
        body,
    });

    let path = parts.uri.path();
    if path.ends_with("/stream") {
        return event_feed().into_response();
    }

    match path {
        "/orders" if parts.method == Method::POST => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"id":42}"#,
        )
            .into_response(),
        "/auth/me" => (
            AppendHeaders([
                (header::SET_COOKIE, "session=abc; HttpOnly"),
                (header::SET_COOKIE, "theme=dark"),
            ]),
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"user":"chef"}"#,
        )
            .into_response(),
        "/orders/missing" => (StatusCode::NOT_FOUND, "no such order").into_response(),
        "/customer/order-history/bulk" => vec![b'x'; BULK_SIZE].into_response(),
        _ => "ok".into_response(),
    }
}

fn event_feed() -> impl IntoResponse {
    let events = futures_util::stream::unfold(0u32, |n| async move {
        if n == 3 {
            return None;
        }
        if n > 0 {
            tokio::time::sleep(EVENT_INTERVAL).await;
        }
        let event = Bytes::from(format!("data: event {}\n\n", n));
        Some((Ok::<_, Infallible>(event), n + 1))
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(events),
    )
}

/// Proxy configuration pointing at `upstream`.
pub fn proxy_config(upstream: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream.to_string();
    config
}

/// Start the proxy on an ephemeral port in front of `upstream`.
///
/// Keep the returned handle alive for the whole test: dropping it closes
/// the shutdown channel and the server stops.
pub async fn start_proxy(upstream: &str) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(proxy_config(upstream)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// An address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

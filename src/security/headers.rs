//! Header policy between client and upstream.
//!
//! # Responsibilities
//! - Request direction: forward only the headers a route allow-lists
//! - Response direction: mirror every upstream header back to the client
//!
//! # Design Decisions
//! - The two directions are separate types so the allow-list reaching the
//!   upstream can be read per route in one place
//! - Multi-value headers keep every value and their order (append, not insert)
//! - Hop-by-hop headers are never mirrored; the local server owns framing

use axum::http::header::{HeaderMap, HeaderName};

/// Request headers a route forwards to the upstream.
///
/// Anything not named here is dropped, including `Host` (the HTTP client
/// derives it from the target URL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardHeaders {
    /// Public pass-through reads.
    None,
    /// Simple JSON writes.
    ContentType,
    /// Authenticated reads.
    Auth,
    /// Authenticated writes.
    ContentTypeAndAuth,
}

impl ForwardHeaders {
    /// Header names on the allow-list, lowercase.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            ForwardHeaders::None => &[],
            ForwardHeaders::ContentType => &["content-type"],
            ForwardHeaders::Auth => &["authorization", "cookie"],
            ForwardHeaders::ContentTypeAndAuth => &["content-type", "authorization", "cookie"],
        }
    }

    /// Copy every value of every allow-listed header from `inbound` to `outbound`.
    pub fn apply(self, inbound: &HeaderMap, outbound: &mut HeaderMap) {
        for &name in self.names() {
            for value in inbound.get_all(name) {
                outbound.append(HeaderName::from_static(name), value.clone());
            }
        }
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Mirror every upstream response header onto the client response.
pub fn mirror_response_headers(upstream: &HeaderMap, client: &mut HeaderMap) {
    for (name, value) in upstream {
        if is_hop_by_hop(name) {
            continue;
        }
        client.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.append(header::COOKIE, HeaderValue::from_static("session=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8"));
        headers.insert(header::HOST, HeaderValue::from_static("shop.example"));
        headers
    }

    #[test]
    fn none_forwards_nothing() {
        let mut out = HeaderMap::new();
        ForwardHeaders::None.apply(&inbound(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn content_type_only() {
        let mut out = HeaderMap::new();
        ForwardHeaders::ContentType.apply(&inbound(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[header::CONTENT_TYPE], "application/json");
        assert!(out.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn auth_keeps_every_cookie_value() {
        let mut out = HeaderMap::new();
        ForwardHeaders::Auth.apply(&inbound(), &mut out);
        assert_eq!(out[header::AUTHORIZATION], "Bearer abc");
        let cookies: Vec<_> = out.get_all(header::COOKIE).iter().collect();
        assert_eq!(cookies, ["session=1", "theme=dark"]);
        assert!(out.get(header::CONTENT_TYPE).is_none());
        assert!(out.get(header::HOST).is_none());
    }

    #[test]
    fn absent_headers_are_not_invented() {
        let mut out = HeaderMap::new();
        ForwardHeaders::ContentTypeAndAuth.apply(&HeaderMap::new(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn mirror_appends_and_skips_hop_by_hop() {
        let mut upstream = HeaderMap::new();
        upstream.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        upstream.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        upstream.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        upstream.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

        let mut client = HeaderMap::new();
        client.insert("x-request-id", HeaderValue::from_static("req-1"));
        mirror_response_headers(&upstream, &mut client);

        let cookies: Vec<_> = client.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
        assert_eq!(client[header::CONTENT_TYPE], "text/plain");
        assert_eq!(client["x-request-id"], "req-1");
        assert!(client.get(header::TRANSFER_ENCODING).is_none());
        assert!(client.get(header::CONNECTION).is_none());
    }
}

//! Response relay from upstream to client.
//!
//! # Responsibilities
//! - Commit the upstream status and mirrored headers to the client response
//! - Buffered mode: read the whole upstream body, then send it in one piece
//! - Streaming mode: hand each upstream chunk to the client as its own frame
//!
//! # Design Decisions
//! - Both modes share the status/header commit step
//! - Streaming frames are capped at `STREAM_CHUNK_SIZE`; hyper flushes the
//!   connection whenever the next frame is not ready yet, so event boundaries
//!   reach the client without waiting for more data
//! - Once streaming has begun the status is committed: an upstream read error
//!   ends the body cleanly instead of surfacing an error
//! - Only the in-flight chunk is held; a slow client stops upstream reads

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::response::Parts;
use axum::http::Response;
use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use http_body_util::BodyExt;

use crate::error::{BoxError, GatewayError};
use crate::security::mirror_response_headers;

/// Largest frame the streaming relay hands to the client.
pub const STREAM_CHUNK_SIZE: usize = 32 * 1024;

/// How a route returns the upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Read the full body, then write it at once.
    Buffered,
    /// Incremental read-flush-write, for event feeds.
    Streaming,
}

impl RelayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMode::Buffered => "buffered",
            RelayMode::Streaming => "streaming",
        }
    }

    /// Turn an upstream response into the client response.
    ///
    /// Only buffered mode can fail, and only while reading the upstream body.
    pub async fn relay<B>(self, upstream: Response<B>) -> Result<Response<Body>, GatewayError>
    where
        B: HttpBody<Data = Bytes> + Send + Unpin + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = upstream.into_parts();
        match self {
            RelayMode::Buffered => {
                let bytes = body
                    .collect()
                    .await
                    .map_err(|e| GatewayError::UpstreamBody(e.into()))?
                    .to_bytes();
                Ok(commit(&parts, Body::from(bytes)))
            }
            RelayMode::Streaming => Ok(commit(&parts, Body::new(StreamRelayBody::new(body)))),
        }
    }
}

/// Status and mirrored headers, then the body.
fn commit(upstream: &Parts, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = upstream.status;
    mirror_response_headers(&upstream.headers, response.headers_mut());
    response
}

/// Body wrapper that re-frames upstream data into chunks of at most
/// `STREAM_CHUNK_SIZE` bytes and ends quietly on upstream errors.
pub struct StreamRelayBody<B> {
    inner: B,
    pending: Bytes,
    finished: bool,
    chunks: u64,
    bytes: u64,
}

impl<B> StreamRelayBody<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            pending: Bytes::new(),
            finished: false,
            chunks: 0,
            bytes: 0,
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            tracing::debug!(chunks = self.chunks, bytes = self.bytes, "Stream relay finished");
        }
    }
}

impl<B> HttpBody for StreamRelayBody<B>
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        let this = &mut *self;
        loop {
            if !this.pending.is_empty() {
                let len = this.pending.len().min(STREAM_CHUNK_SIZE);
                let chunk = this.pending.split_to(len);
                this.chunks += 1;
                this.bytes += len as u64;
                return Poll::Ready(Some(Ok(Frame::data(chunk))));
            }

            if this.finished {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.inner).poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    // Trailers are not relayed.
                    if let Ok(data) = frame.into_data() {
                        this.pending = data;
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    let error: BoxError = e.into();
                    tracing::debug!(error = %error, "Upstream stream interrupted");
                    this.finish();
                    return Poll::Ready(None);
                }
                Poll::Ready(None) => {
                    this.finish();
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.finished && self.pending.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        // Unknown length keeps the response chunked.
        SizeHint::default()
    }
}

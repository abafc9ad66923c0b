//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → handlers.rs (dispatch via routing table)
//!     → forwarder.rs (read body, build outbound request, call upstream)
//!     → relay.rs (buffered or streaming response)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod handlers;
pub mod relay;
pub mod request;
pub mod server;

pub use forwarder::{Forwarder, Upstream};
pub use relay::{RelayMode, STREAM_CHUNK_SIZE};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};

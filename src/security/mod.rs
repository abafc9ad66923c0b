//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers:
//!     → headers.rs (route allow-list)
//!     → only allow-listed headers reach the upstream
//!
//! Upstream response headers:
//!     → headers.rs (mirror, minus hop-by-hop)
//!     → client
//! ```
//!
//! # Design Decisions
//! - Fail closed: a header is dropped unless the route names it
//! - No trust in client input; nothing is added on the way upstream

pub mod headers;

pub use headers::{mirror_response_headers, ForwardHeaders};

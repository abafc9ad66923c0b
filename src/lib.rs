//! Storefront reverse proxy library.
//!
//! Fronts a single restaurant ordering backend: a fixed route table decides
//! which requests pass, which inbound headers travel with them, and whether
//! the upstream response is relayed whole or streamed chunk by chunk.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Storefront reverse proxy.
//!
//! Single-upstream HTTP proxy for a restaurant ordering backend, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                  STOREFRONT PROXY                     │
//!                     │                                                       │
//!   Client Request    │  ┌─────────┐    ┌──────────┐    ┌─────────────┐      │
//!   ──────────────────┼─▶│  http   │───▶│ routing  │───▶│  forwarder  │──────┼──▶ Upstream
//!                     │  │ server  │    │  table   │    │ + allow-list│      │    Backend
//!                     │  └─────────┘    └────┬─────┘    └──────┬──────┘      │
//!                     │                      │ 404/405         │ 400/502     │
//!                     │                      ▼                 ▼             │
//!   Client Response   │  ┌──────────────────────────────────────────────┐   │
//!   ◀─────────────────┼──│  relay: buffered body or 32 KiB SSE chunks   │◀──┼─── Upstream
//!                     │  └──────────────────────────────────────────────┘   │    Response
//!                     │                                                       │
//!                     │  ┌──────────────────────────────────────────────┐   │
//!                     │  │  config · observability · lifecycle          │   │
//!                     │  └──────────────────────────────────────────────┘   │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use storefront_proxy::config::{load_config, ProxyConfig};
use storefront_proxy::lifecycle;
use storefront_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "storefront-proxy")]
#[command(about = "Reverse proxy for the restaurant ordering backend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the upstream base URL
    #[arg(short, long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.base_url = upstream;
    }

    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        "storefront-proxy starting"
    );

    lifecycle::run(config).await?;
    Ok(())
}

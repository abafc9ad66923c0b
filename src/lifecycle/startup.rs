//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration and build the server
//! - Install the metrics exporter when enabled
//! - Bind the listener and serve until a stop signal
//! - Bound the drain of in-flight requests after the signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)
//! - Open event streams never end on their own, so draining has a deadline

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ProxyConfig, ValidationError};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::metrics::init_metrics;

/// Errors that stop the proxy from starting or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the proxy and run it until SIGINT or SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let server = HttpServer::new(config)?;
    let config = server.config().clone();

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::MetricsAddress(
                config.observability.metrics_address.clone(),
            )])
        })?;
        init_metrics(addr)?;
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.trigger();
    });

    let grace = Duration::from_secs(config.listener.shutdown_grace_secs);
    serve(server, listener, &shutdown, grace).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Serve on `listener` until `shutdown` fires, then give in-flight requests
/// at most `grace` to finish.
pub async fn serve(
    server: HttpServer,
    listener: TcpListener,
    shutdown: &Shutdown,
    grace: Duration,
) -> Result<(), StartupError> {
    let mut deadline = shutdown.subscribe();
    let serving = server.run(listener, shutdown.subscribe());
    tokio::pin!(serving);

    tokio::select! {
        result = &mut serving => result.map_err(StartupError::Serve),
        _ = async {
            let _ = deadline.recv().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_secs = grace.as_secs(), "Drain deadline reached, dropping open connections");
            Ok(())
        }
    }
}

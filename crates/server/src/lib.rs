//! HTTP front end for feed-diet.
//!
//! Wires an [`HttpFetcher`] into a [`FeedOrchestrator`] and exposes it
//! through an axum router. Every request fetches the upstream feed anew.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use feed_source::HttpFetcher;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::AppError;
pub use orchestrator::{FeedOrchestrator, RenderedFeed};
pub use routes::router;

/// Serve `orchestrator` on an already-bound listener until ctrl-c
pub async fn run(listener: TcpListener, orchestrator: FeedOrchestrator) -> std::io::Result<()> {
    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind `config.bind_addr` and serve the filtered feed
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::with_timeout(config.request_timeout)
        .context("Failed to build HTTP client")?;
    let orchestrator = FeedOrchestrator::new(Arc::new(fetcher), &config);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        "Listening on {} (feed: {}, max concurrency: {:?})",
        listener.local_addr()?,
        config.feed_url,
        config.engine.max_concurrency
    );

    run(listener, orchestrator).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

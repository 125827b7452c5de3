//! absmeta server entry point.
//!
//! Boots the metadata HTTP API: loads configuration, builds the provider
//! registry and cache, and serves until Ctrl-C or SIGTERM.
//! Logs are JSON on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use absmeta_core::{AppConfig, MemoryCache, MetadataService};

mod error;
mod handler;
mod providers;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting absmeta server");

    let registry = providers::build_registry(&config).context("failed to build providers")?;

    let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
    let sweeper = cache.spawn_sweeper(config.cache_sweep_interval());

    let service =
        MetadataService::new(Arc::new(registry), Arc::clone(&cache)).with_default_ttl(config.default_cache_ttl());
    let app = routes::router(handler::AppState::new(service));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("server error")?;

    sweeper.cancel();
    tracing::info!("server exiting");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down server");
}

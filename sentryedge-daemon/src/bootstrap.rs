//! Daemon startup: configuration resolution and service assembly.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use sentryedge_core::config::SentryEdgeConfig;
use sentryedge_core::metrics::STORED_LOGS;
use sentryedge_core::pipeline::LogStore;
use sentryedge_normalizer::{Normalizer, NormalizerConfig};

use crate::app::{AppState, build_router};
use crate::cli::DaemonCli;

/// Resolve the effective configuration.
///
/// Order: defaults -> file -> `SENTRYEDGE_*` environment -> CLI flags.
/// A missing file at the given path falls back to defaults.
pub async fn resolve_config(cli: &DaemonCli) -> Result<SentryEdgeConfig> {
    let mut config = if Path::new(&cli.config).exists() {
        SentryEdgeConfig::from_file(&cli.config)
            .await
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    } else {
        SentryEdgeConfig::default()
    };

    config.apply_env_overrides();

    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }

    config.validate().context("configuration validation failed")?;
    Ok(config)
}

/// Build the normalizer, open the store and assemble the router.
pub async fn build_app(config: &SentryEdgeConfig) -> Result<Router> {
    let normalizer = Normalizer::new(NormalizerConfig::from_core(&config.normalizer))
        .context("failed to build normalizer")?;
    info!(
        formats = ?normalizer.registry().registered_formats(),
        max_unwrap_depth = normalizer.config().max_unwrap_depth,
        "normalizer ready"
    );

    let store = sentryedge_store::open_store(&config.storage)
        .await
        .context("failed to open log store")?;
    let stored = store.count().await.context("failed to count stored logs")?;
    metrics::gauge!(STORED_LOGS).set(stored as f64);
    info!(backend = store.backend_name(), stored, "log store ready");

    let state = AppState::new(normalizer, Arc::clone(&store), config.server.clone());
    build_router(state)
}

/// Serve the router until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "ingestion API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use sentryedge_daemon::bootstrap::{build_app, resolve_config, serve};
use sentryedge_daemon::cli::DaemonCli;
use sentryedge_daemon::logging::init_tracing;
use sentryedge_daemon::metrics_server::install_metrics_recorder;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();
    let config = resolve_config(&cli).await?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sentryedge-daemon starting");

    if config.metrics.enabled {
        install_metrics_recorder(&config.metrics)?;
    }

    let router = build_app(&config).await?;
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    serve(listener, router, shutdown_signal()).await?;

    tracing::info!("sentryedge-daemon shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

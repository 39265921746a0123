use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hsn_logging::HsnSubscriberBuilder;
use hsn_webhook::{build_router, fallback, loader, AppState, Cli};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    let _log_guard = HsnSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .init();

    // Built once, before the listener accepts anything
    let index = loader::load_index(&config.data_path, &config.columns)
        .with_context(|| format!("loading HSN data from {}", config.data_path.display()))?;
    let fallback = fallback::from_config(&config.fallback)?;

    let app = build_router(AppState::new(Arc::new(index), fallback));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

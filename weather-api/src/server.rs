use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use weather_core::WeatherService;

use crate::routes;

/// Serve the API on `addr` until ctrl-c.
pub async fn serve(service: Arc<WeatherService>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let local = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!(
        app = %service.settings().app_name,
        "Web server running at http://{local}"
    );

    axum::serve(listener, routes::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("got SIGINT, shutting down"),
        Err(err) => {
            tracing::warn!(%err, "could not listen for SIGINT");
            std::future::pending::<()>().await
        }
    }
}

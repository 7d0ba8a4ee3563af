//! # reqval-api — Binary Entry Point
//!
//! Serves the demo validation service. Port and body limit come from the
//! environment (see [`reqval_api::config`]).

use anyhow::Context;
use reqval_api::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Compile every route schema before binding the port.
    let app = reqval_api::app(&config).map_err(|e| {
        tracing::error!("Schema compilation failed: {e}");
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(body_limit = config.body_limit, "reqval demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Bakuwaki forecast server
//!
//! Serves weekly firefly-squid predictions over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use bakuwaki_forecast_backend::{config::Config, routes, AppError, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bakuwaki_server=debug,bakuwaki_forecast_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().map_err(|e| AppError::Configuration(e.to_string()))?;

    tracing::info!("Starting bakuwaki forecast server");
    tracing::info!("Environment: {}", config.environment);

    // One connection pool for both providers, dropped at shutdown
    let http_client = reqwest::Client::builder()
        .timeout(config.http.timeout())
        .build()
        .context("failed to build HTTP client")?;

    // Trained artifacts are required to serve anything
    let state = AppState::from_config(&config, http_client)?;

    let cors = routes::cors_layer(&config.cors).context("invalid CORS origin")?;
    let app = routes::create_app(state, cors);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host {}", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
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

    tracing::info!("Shutdown signal received");
}

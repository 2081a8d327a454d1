//! Tagged Cache server
//!
//! Runs the tagged cache over the in-memory store behind an HTTP admin API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagged_cache::{api::create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the Tagged Cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `.env` (if present) and configuration from environment variables
/// 3. Create the in-memory store and tagged cache
/// 4. Start background TTL cleanup task
/// 5. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagged_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tagged Cache Server");

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, port={}, cleanup_interval={}s",
        config.max_entries, config.default_ttl, config.server_port, config.cleanup_interval
    );

    let state = AppState::from_config(&config);
    info!("Tagged cache initialized");

    let cleanup_handle = spawn_cleanup_task(state.store(), config.cleanup_interval);
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}

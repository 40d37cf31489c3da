//! ShortPress HTTP server.
//!
//! Exposes users, categories, and variables over JSON, with nested
//! `{{identifier}}` references expanded on read. Callers are identified
//! by the `x-user-id` header set by an upstream authenticating proxy.

pub mod config;
pub mod error;
pub mod extract;
mod handlers;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};
pub use routes::router;
pub use state::AppState;

/// Builds the application state from `config` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid, the snapshot cannot be
/// loaded, the admin cannot be bootstrapped, or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let state = AppState::from_config(&config).await?;
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

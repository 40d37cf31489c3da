//! ShortPress server binary.

use anyhow::Context;
use shortpress_server::ServerConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("failed to load configuration")?;

    tracing::info!(
        "Starting ShortPress server v{}",
        env!("CARGO_PKG_VERSION")
    );

    shortpress_server::run_server(config).await?;

    Ok(())
}

//! Vaulto Swap backend: market-data API.
//!
//! Responsibilities:
//! - Uniswap v3 liquidity search and token details
//! - Solana market caps and tokenized-stock quotes
//! - Price, logo and restricted-region lookups for the swap UI

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vaulto_backend::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = vaulto_core::load_app_config()?;

    tracing::info!("Vaulto backend starting...");

    let state = Arc::new(AppState::from_config(&config).await?);
    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

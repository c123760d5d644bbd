//! Builds the market-data facade from the effective config.

use anyhow::Result;
use tracing::debug;

use vaulto_core::{load_app_config, MarketData};
use vaulto_types::config::AppConfig;

/// Config from `~/.vaulto/config.toml`, `.env` and the environment.
pub fn config() -> Result<AppConfig> {
    let config = load_app_config()?;
    debug!(
        graph_key = !config.subgraph.api_key.is_empty(),
        coingecko_tier = ?config.coingecko.tier,
        "config loaded"
    );
    Ok(config)
}

pub fn market() -> Result<MarketData> {
    Ok(MarketData::from_config(&config()?))
}

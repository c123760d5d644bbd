//! Shared application state for the API server.

use tracing::{info, warn};

use vaulto_core::{GeoClient, LogoCache, MarketData};
use vaulto_types::config::AppConfig;

use crate::clients::cache::Cache;

/// Backend application state: shared across all request handlers.
pub struct AppState {
    pub config: AppConfig,
    pub market: MarketData,
    pub geo: GeoClient,
    pub logos: LogoCache,
    /// Response cache; `None` when no Redis URL is configured or it is down.
    pub cache: Option<Cache>,
}

impl AppState {
    /// Assemble from already-built parts, without Redis.
    pub fn new(config: &AppConfig, market: MarketData) -> Self {
        Self {
            config: config.clone(),
            market,
            geo: GeoClient::new(&config.geo),
            logos: LogoCache::from_config(&config.logos),
            cache: None,
        }
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let mut state = Self::new(config, MarketData::from_config(config));

        if let Some(url) = &config.cache.redis_url {
            match Cache::connect(url).await {
                Ok(cache) => {
                    info!("Redis cache connected");
                    state.cache = Some(cache);
                }
                Err(e) => warn!(error = %e, "Redis unavailable, serving uncached"),
            }
        }
        Ok(state)
    }
}

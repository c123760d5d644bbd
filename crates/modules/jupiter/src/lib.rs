//! Jupiter data for Solana mints: market cap scraped from the token page,
//! liquidity and 24h volume from the token API.

use async_trait::async_trait;
use tracing::info;

use vaulto_common::error::VaultoResult;
use vaulto_common::traits::SolanaMarketSource;
use vaulto_common::types::SolanaTokenStats;
use vaulto_types::config::JupiterConfig;

pub mod api;
pub mod extract;
pub mod scraper;

pub use api::JupiterClient;
pub use extract::{MarketCapExtractor, NextDataExtractor, StockMcButtonExtractor};
pub use scraper::JupiterScraper;
pub use vaulto_utils::format::parse_market_cap;

/// Scraper + token API behind one [`SolanaMarketSource`].
pub struct JupiterModule {
    pub scraper: JupiterScraper,
    pub client: JupiterClient,
}

impl JupiterModule {
    pub fn new(config: &JupiterConfig) -> Self {
        info!(page_base = %config.page_base, api_base = %config.api_base, "Jupiter module initialized");
        Self {
            scraper: JupiterScraper::new(&config.page_base),
            client: JupiterClient::new(&config.api_base),
        }
    }
}

#[async_trait]
impl SolanaMarketSource for JupiterModule {
    async fn token_stats(&self, mint: &str) -> VaultoResult<SolanaTokenStats> {
        self.client.token_stats(mint).await
    }

    async fn market_cap(&self, mint: &str) -> Option<String> {
        self.scraper.market_cap(mint).await
    }
}

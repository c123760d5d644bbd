//! Uniswap v3 market data from The Graph.
//!
//! Every query goes through a [`SubgraphTransport`], which is the HTTP
//! [`SubgraphClient`] in production and [`mock::MockSubgraph`] in tests.

use std::sync::Arc;

use tracing::info;

use vaulto_common::constants::{DEFAULT_ETH_PRICE_USD, MAX_QUERY_LIMIT};
use vaulto_types::config::AppConfig;

pub mod client;
pub mod details;
pub mod history;
pub mod pools;
pub mod queries;
pub mod schema;
pub mod search;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{SubgraphClient, SubgraphTransport};
pub use details::{identity_from_pools, resolve_price, TokenDetails, TokenIdentity};

/// Protocol label used in errors and logs.
pub const PROTOCOL: &str = "uniswap-subgraph";

/// Uniswap v3 data module.
pub struct UniswapModule {
    transport: Arc<dyn SubgraphTransport>,
    /// ETH/USD used when a token only has a `derivedETH` price.
    eth_price_usd: f64,
}

impl UniswapModule {
    pub fn new(transport: Arc<dyn SubgraphTransport>) -> Self {
        Self {
            transport,
            eth_price_usd: DEFAULT_ETH_PRICE_USD,
        }
    }

    /// Build the HTTP-backed module from the app config.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = SubgraphClient::new(&config.subgraph);
        info!(
            overrides = config.subgraph.endpoints.len(),
            eth_price = config.pricing.assumed_eth_price_usd,
            "Uniswap module initialized"
        );
        Self::new(Arc::new(client)).with_eth_price(config.pricing.assumed_eth_price_usd)
    }

    pub fn with_eth_price(mut self, eth_price_usd: f64) -> Self {
        self.eth_price_usd = eth_price_usd;
        self
    }

    pub fn eth_price_usd(&self) -> f64 {
        self.eth_price_usd
    }

    /// Whether queries for `chain_id` can be served at all.
    pub fn supports_chain(&self, chain_id: u64) -> bool {
        self.transport.supports_chain(chain_id)
    }
}

/// Clamp a caller-supplied `first:` into `1..=100`.
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_QUERY_LIMIT)
}

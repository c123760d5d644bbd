//! The market-data facade: one handle per source, plus the fan-out
//! compositions the routes and the CLI share.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::traits::SolanaMarketSource;
use vaulto_mod_coingecko::CoinGeckoClient;
use vaulto_mod_jupiter::JupiterModule;
use vaulto_mod_uniswap::UniswapModule;
use vaulto_mod_yahoo::{resolve_ticker, YahooClient};
use vaulto_types::config::AppConfig;
use vaulto_types::output::{
    LiquidityResponse, LiquidityTokenResult, MarketCapOutput, SolanaTokenData, StockDataResponse,
    TokenDetailsApiResponse, TokenInfo,
};
use vaulto_utils::format::{format_price_or_na, parse_market_cap};

/// Pools attached to each liquidity search hit.
pub const POOLS_PER_TOKEN: u32 = 10;

/// Default result count for liquidity search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

pub struct MarketData {
    pub uniswap: UniswapModule,
    pub coingecko: CoinGeckoClient,
    pub solana: Arc<dyn SolanaMarketSource>,
    pub yahoo: YahooClient,
    stock_tickers: HashMap<String, String>,
}

impl MarketData {
    /// Assemble from explicit Uniswap and Solana sources; CoinGecko and
    /// Yahoo come from `config`.
    pub fn new(config: &AppConfig, uniswap: UniswapModule, solana: Arc<dyn SolanaMarketSource>) -> Self {
        Self {
            uniswap,
            coingecko: CoinGeckoClient::new(&config.coingecko),
            solana,
            yahoo: YahooClient::new(&config.yahoo.base_url),
            stock_tickers: config.stocks.tickers.clone(),
        }
    }

    /// Every source over HTTP.
    pub fn from_config(config: &AppConfig) -> Self {
        let market = Self::new(
            config,
            UniswapModule::from_config(config),
            Arc::new(JupiterModule::new(&config.jupiter)),
        );
        info!(stock_tickers = market.stock_tickers.len(), "market data ready");
        market
    }

    /// Token search with each hit's pools attached.
    ///
    /// An unsupported chain is an error here so the route can answer 400;
    /// a failed search is reported in `error` next to an empty list.
    pub async fn liquidity(&self, chain_id: u64, query: &str, limit: Option<u32>) -> VaultoResult<LiquidityResponse> {
        if !self.uniswap.supports_chain(chain_id) {
            return Err(VaultoError::UnsupportedChain(chain_id));
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        let tokens = match self.uniswap.try_search_tokens(chain_id, query, limit).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(chain_id, query, error = %e, "liquidity search failed");
                return Ok(LiquidityResponse {
                    chain_id,
                    tokens: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
        };

        let pools = join_all(
            tokens
                .iter()
                .map(|t| self.uniswap.pools_for_token(chain_id, &t.address, POOLS_PER_TOKEN)),
        )
        .await;

        let tokens: Vec<LiquidityTokenResult> = tokens
            .into_iter()
            .zip(pools)
            .map(|(token, pools)| LiquidityTokenResult::new(token, pools))
            .collect();
        debug!(chain_id, query, hits = tokens.len(), "liquidity");

        Ok(LiquidityResponse {
            chain_id,
            tokens,
            error: None,
        })
    }

    /// Details, chart series and pools for one EVM token.
    pub async fn token_details(&self, chain_id: u64, address: &str, days: u32) -> VaultoResult<TokenDetailsApiResponse> {
        let details = self.uniswap.token_details(chain_id, address, days).await?;
        let (price_history, tvl_history, volume_history) =
            TokenDetailsApiResponse::split_history(&details.history);

        Ok(TokenDetailsApiResponse {
            chain_id: details.chain_id,
            token: TokenInfo {
                address: details.identity.address,
                symbol: details.identity.symbol,
                name: details.identity.name,
                decimals: details.identity.decimals,
            },
            identity_source: details.identity.strategy,
            stats_source: details.stats_source,
            price_usd: details.price_usd,
            price_source: details.price_source,
            price_formatted: format_price_or_na(details.price_usd),
            tvl_usd: details.tvl_usd,
            volume_usd: details.volume_usd,
            volume_24h_usd: details.volume_24h_usd,
            price_history,
            tvl_history,
            volume_history,
            pools: details.pools,
        })
    }

    pub async fn solana_token_data(&self, addresses: &[String]) -> Vec<SolanaTokenData> {
        solana_token_data(self.solana.as_ref(), addresses).await
    }

    /// Scraped market cap for one mint, formatted and numeric.
    pub async fn market_cap(&self, mint: &str) -> MarketCapOutput {
        let formatted = self.solana.market_cap(mint.trim()).await;
        MarketCapOutput {
            address: mint.trim().to_string(),
            market_cap: formatted.as_deref().and_then(parse_market_cap),
            market_cap_formatted: formatted,
        }
    }

    /// Quote and daily candles for a ticker, xStock symbol or mapped
    /// token address.
    pub async fn stock_data(&self, input: &str) -> VaultoResult<StockDataResponse> {
        let ticker = resolve_ticker(input, &self.stock_tickers)
            .ok_or_else(|| VaultoError::TickerNotFound(input.trim().to_string()))?;
        let data = self.yahoo.chart(&ticker).await?;
        Ok(StockDataResponse {
            ticker,
            quote: data.quote,
            history: data.history,
        })
    }
}

/// Stats and market cap for every mint, concurrently.
///
/// Always one entry per input, in input order. A mint whose stats fail is
/// reported as `{address, volumeUSD: 0}` even if its market cap resolved.
pub async fn solana_token_data(source: &dyn SolanaMarketSource, addresses: &[String]) -> Vec<SolanaTokenData> {
    join_all(addresses.iter().map(|address| async move {
        let (stats, market_cap) = tokio::join!(source.token_stats(address), source.market_cap(address));
        match stats {
            Ok(stats) => SolanaTokenData {
                address: address.clone(),
                tvl_usd: stats.tvl_usd,
                volume_usd: stats.volume_usd,
                market_cap: market_cap.as_deref().and_then(parse_market_cap),
                market_cap_formatted: market_cap,
            },
            Err(e) => {
                warn!(mint = %address, error = %e, "Solana token stats failed");
                SolanaTokenData::empty(address)
            }
        }
    }))
    .await
}

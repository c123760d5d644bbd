//! Token details: identity, aggregate stats, price and history.

use serde_json::json;
use tracing::{debug, warn};

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{
    is_evm_address, normalize_address, IdentityStrategy, Pool, PriceSource, StatsSource, Token,
    TokenDayData,
};

use crate::queries::{TOKEN_BY_ID, TOKEN_FULL};
use crate::schema::{decode, TokenData};
use crate::UniswapModule;

/// Pools fetched alongside the details (also the identity source).
const DETAILS_POOL_LIMIT: u32 = 10;

/// Symbol, name and decimals of a token, plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenIdentity {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub strategy: IdentityStrategy,
}

impl TokenIdentity {
    fn from_token(token: &Token, strategy: IdentityStrategy) -> Self {
        Self {
            address: token.address.clone(),
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            decimals: token.decimals,
            strategy,
        }
    }
}

/// Everything the details view needs, before formatting.
#[derive(Debug, Clone)]
pub struct TokenDetails {
    pub chain_id: u64,
    pub identity: TokenIdentity,
    pub stats_source: StatsSource,
    pub tvl_usd: f64,
    /// All-time volume.
    pub volume_usd: f64,
    /// Most recent day's volume.
    pub volume_24h_usd: f64,
    pub price_usd: f64,
    pub price_source: PriceSource,
    pub history: Vec<TokenDayData>,
    pub pools: Vec<Pool>,
}

/// Identity from the matching side of the first pool that contains `address`.
pub fn identity_from_pools(address: &str, pools: &[Pool]) -> Option<TokenIdentity> {
    pools
        .iter()
        .find_map(|pool| pool.side_for(address))
        .map(|token| TokenIdentity::from_token(token, IdentityStrategy::ViaPools))
}

fn usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Pick a USD price, first usable wins:
/// 1. `derived_usd`
/// 2. `derived_eth × eth_price_usd`
/// 3. the most recent history point with a usable price
/// 4. `0.0` / [`PriceSource::Unavailable`]
pub fn resolve_price(
    derived_usd: Option<f64>,
    derived_eth: Option<f64>,
    history: &[TokenDayData],
    eth_price_usd: f64,
) -> (f64, PriceSource) {
    if let Some(price) = derived_usd.filter(|p| usable(*p)) {
        return (price, PriceSource::DerivedUsd);
    }
    if let Some(price) = derived_eth.map(|eth| eth * eth_price_usd).filter(|p| usable(*p)) {
        return (price, PriceSource::DerivedEth);
    }
    if let Some(day) = history
        .iter()
        .filter(|d| usable(d.price_usd))
        .max_by_key(|d| d.timestamp)
    {
        return (day.price_usd, PriceSource::History);
    }
    (0.0, PriceSource::Unavailable)
}

/// Volume of the most recent day, else 0.
pub fn latest_volume(history: &[TokenDayData]) -> f64 {
    history
        .iter()
        .max_by_key(|d| d.timestamp)
        .map(|d| d.volume_usd)
        .unwrap_or(0.0)
}

impl UniswapModule {
    /// Resolve a token's identity.
    ///
    /// Pools are consulted first since the caller has usually fetched them
    /// already; the `token(id:)` entity is the last resort. `Ok(None)` means
    /// the subgraph does not know the token.
    pub async fn resolve_token_identity(
        &self,
        chain_id: u64,
        address: &str,
        pools: &[Pool],
    ) -> VaultoResult<Option<TokenIdentity>> {
        if let Some(identity) = identity_from_pools(address, pools) {
            return Ok(Some(identity));
        }
        let data = self
            .transport
            .execute(chain_id, TOKEN_BY_ID, json!({ "id": normalize_address(address) }))
            .await?;
        let found: TokenData = decode(data, "token identity")?;
        Ok(found
            .token
            .map(Token::from)
            .map(|t| TokenIdentity::from_token(&t, IdentityStrategy::Direct)))
    }

    /// The full `token(id:)` entity: TVL, all-time volume, derived prices.
    pub async fn token_stats(&self, chain_id: u64, address: &str) -> VaultoResult<Option<Token>> {
        let data = self
            .transport
            .execute(chain_id, TOKEN_FULL, json!({ "id": normalize_address(address) }))
            .await?;
        let found: TokenData = decode(data, "token stats")?;
        Ok(found.token.map(Token::from))
    }

    /// Details for one token over a `days`-long history window.
    ///
    /// Pools, stats and history are fetched concurrently. Stats fall back to
    /// pool sums and history to `[]`; only an unknown token or a failed
    /// identity lookup is an error.
    pub async fn token_details(&self, chain_id: u64, address: &str, days: u32) -> VaultoResult<TokenDetails> {
        if !self.supports_chain(chain_id) {
            return Err(VaultoError::UnsupportedChain(chain_id));
        }
        if !is_evm_address(address) {
            return Err(VaultoError::InvalidAddress(address.to_string()));
        }
        let address = normalize_address(address);

        let (pools, stats, history) = tokio::join!(
            self.pools_for_token(chain_id, &address, DETAILS_POOL_LIMIT),
            self.token_stats(chain_id, &address),
            self.token_day_data(chain_id, &address, days),
        );

        let stats = match stats {
            Ok(Some(token)) => Some(token),
            Ok(None) => None,
            Err(e) => {
                warn!(chain_id, token = %address, error = %e, "token stats failed, using pool sums");
                None
            }
        };

        let identity = match (identity_from_pools(&address, &pools), &stats) {
            (Some(identity), _) => identity,
            (None, Some(token)) => TokenIdentity::from_token(token, IdentityStrategy::Direct),
            (None, None) => self
                .resolve_token_identity(chain_id, &address, &pools)
                .await?
                .ok_or_else(|| VaultoError::TokenNotFound(address.clone()))?,
        };

        let (stats_source, tvl_usd, volume_usd, derived_usd, derived_eth) = match &stats {
            Some(token) => (
                StatsSource::Token,
                token.tvl_usd,
                token.volume_usd,
                token.derived_usd,
                token.derived_eth,
            ),
            None => (
                StatsSource::PoolSums,
                pools.iter().map(|p| p.tvl_usd).sum(),
                pools.iter().map(|p| p.volume_usd).sum(),
                None,
                None,
            ),
        };

        let (price_usd, price_source) =
            resolve_price(derived_usd, derived_eth, &history, self.eth_price_usd);
        debug!(
            chain_id,
            token = %address,
            ?price_source,
            ?stats_source,
            pools = pools.len(),
            days = history.len(),
            "token details"
        );

        Ok(TokenDetails {
            chain_id,
            identity,
            stats_source,
            tvl_usd,
            volume_usd,
            volume_24h_usd: latest_volume(&history),
            price_usd,
            price_source,
            history,
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::mock::{day_row, pool_row, MockSubgraph};

    const TOKEN: &str = "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984";
    const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

    fn day(timestamp: i64, price_usd: f64) -> TokenDayData {
        TokenDayData {
            timestamp,
            price_usd,
            tvl_usd: 0.0,
            volume_usd: 0.0,
            fees_usd: 0.0,
        }
    }

    #[test]
    fn test_price_priority_derived_usd_first() {
        let history = [day(1, 5.0)];
        assert_eq!(
            resolve_price(Some(2.0), Some(0.001), &history, 3000.0),
            (2.0, PriceSource::DerivedUsd)
        );
    }

    #[test]
    fn test_price_priority_derived_eth_second() {
        let history = [day(1, 5.0)];
        assert_eq!(
            resolve_price(Some(0.0), Some(0.001), &history, 3000.0),
            (3.0, PriceSource::DerivedEth)
        );
        assert_eq!(
            resolve_price(Some(f64::NAN), Some(0.001), &[], 3000.0),
            (3.0, PriceSource::DerivedEth)
        );
    }

    #[test]
    fn test_price_priority_history_third() {
        let history = [day(1, 4.0), day(3, 0.0), day(2, 6.0)];
        assert_eq!(
            resolve_price(None, Some(0.0), &history, 3000.0),
            (6.0, PriceSource::History)
        );
    }

    #[test]
    fn test_price_unavailable() {
        assert_eq!(
            resolve_price(None, None, &[day(1, 0.0)], 3000.0),
            (0.0, PriceSource::Unavailable)
        );
        assert_eq!(
            resolve_price(None, Some(f64::INFINITY), &[], 3000.0),
            (0.0, PriceSource::Unavailable)
        );
    }

    #[test]
    fn test_identity_from_pools_either_side() {
        let pools: Vec<Pool> = [
            pool_row("0xp1", "3000", "10", (WETH, "WETH"), (TOKEN, "UNI")),
        ]
        .into_iter()
        .map(|v| serde_json::from_value::<crate::schema::RawPool>(v).unwrap().into())
        .collect();

        let identity = identity_from_pools(TOKEN, &pools).unwrap();
        assert_eq!(identity.symbol, "UNI");
        assert_eq!(identity.decimals, 18);
        assert_eq!(identity.strategy, IdentityStrategy::ViaPools);
        assert!(identity_from_pools("0xdead", &pools).is_none());
    }

    #[tokio::test]
    async fn test_details_uses_token_stats() {
        let mock = Arc::new(MockSubgraph::new(|op, _| match op {
            "PoolsForToken" => Ok(json!({
                "asToken0": [],
                "asToken1": [pool_row("0xp1", "3000", "100", (WETH, "WETH"), (TOKEN, "UNI"))],
            })),
            "TokenFull" => Ok(json!({ "token": {
                "id": TOKEN, "symbol": "UNI", "name": "Uniswap", "decimals": "18",
                "totalValueLockedUSD": "5000", "volumeUSD": "90000", "derivedETH": "0.002"
            }})),
            "TokenDayData" => Ok(json!({ "tokenDayDatas": [
                day_row(1_700_000_000, "6.1", "111"),
                day_row(1_700_086_400, "6.2", "222"),
            ]})),
            other => panic!("unexpected operation {other}"),
        }));
        let module = UniswapModule::new(mock.clone()).with_eth_price(3000.0);

        let details = module.token_details(1, TOKEN, 30).await.unwrap();
        assert_eq!(details.identity.strategy, IdentityStrategy::ViaPools);
        assert_eq!(details.stats_source, StatsSource::Token);
        assert_eq!(details.tvl_usd, 5000.0);
        assert_eq!(details.volume_usd, 90000.0);
        assert_eq!(details.volume_24h_usd, 222.0);
        assert_eq!(details.price_source, PriceSource::DerivedEth);
        assert!((details.price_usd - 6.0).abs() < 1e-9);
        assert_eq!(mock.calls_to("TokenById"), 0);
    }

    #[tokio::test]
    async fn test_details_falls_back_to_pool_sums_and_direct_identity() {
        let mock = Arc::new(MockSubgraph::new(|op, _| match op {
            "PoolsForToken" => Ok(json!({ "asToken0": [], "asToken1": [] })),
            "TokenFull" => Err(VaultoError::protocol("uniswap-subgraph", "field not found")),
            "TokenById" => Ok(json!({ "token": {
                "id": TOKEN, "symbol": "UNI", "name": "Uniswap", "decimals": "18"
            }})),
            "TokenDayData" => Ok(json!({ "tokenDayDatas": [] })),
            other => panic!("unexpected operation {other}"),
        }));
        let module = UniswapModule::new(mock);

        let details = module.token_details(1, TOKEN, 7).await.unwrap();
        assert_eq!(details.identity.strategy, IdentityStrategy::Direct);
        assert_eq!(details.stats_source, StatsSource::PoolSums);
        assert_eq!(details.tvl_usd, 0.0);
        assert_eq!(details.price_source, PriceSource::Unavailable);
        assert_eq!(details.volume_24h_usd, 0.0);
    }

    #[tokio::test]
    async fn test_details_unknown_token() {
        let mock = Arc::new(MockSubgraph::new(|op, _| match op {
            "PoolsForToken" => Ok(json!({ "asToken0": [], "asToken1": [] })),
            "TokenFull" | "TokenById" => Ok(json!({ "token": null })),
            _ => Ok(json!({ "tokenDayDatas": [] })),
        }));
        let module = UniswapModule::new(mock);
        assert!(matches!(
            module.token_details(1, TOKEN, 30).await,
            Err(VaultoError::TokenNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_details_validates_input() {
        let module = UniswapModule::new(Arc::new(MockSubgraph::new(|_, _| Ok(json!({})))));
        assert!(matches!(
            module.token_details(999, TOKEN, 30).await,
            Err(VaultoError::UnsupportedChain(999))
        ));
        assert!(matches!(
            module.token_details(1, "uni", 30).await,
            Err(VaultoError::InvalidAddress(_))
        ));
    }
}

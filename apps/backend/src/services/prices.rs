//! CoinGecko prices with the Redis cache in front.

use vaulto_common::error::VaultoResult;
use vaulto_common::types::{token_cache_key, CoinPrice};
use vaulto_mod_coingecko::CoinGeckoClient;

use crate::clients::cache::{Cache, CacheTtl};

/// Price service with caching layer. Only hits are cached.
pub struct PriceService;

impl PriceService {
    pub async fn by_symbol(
        client: &CoinGeckoClient,
        cache: Option<&Cache>,
        symbol: &str,
    ) -> VaultoResult<Option<CoinPrice>> {
        let symbol = symbol.trim().to_ascii_lowercase();
        let cache_key = Cache::key("cg:price", &[&symbol]);
        if let Some(cached) = Self::cached(cache, &cache_key).await {
            return Ok(Some(cached));
        }

        let result = client.price_by_symbol(&symbol).await?;
        Self::store(cache, &cache_key, result.as_ref()).await;
        Ok(result)
    }

    pub async fn by_address(
        client: &CoinGeckoClient,
        cache: Option<&Cache>,
        chain_id: u64,
        address: &str,
    ) -> VaultoResult<Option<CoinPrice>> {
        let cache_key = Cache::key("cg:token_price", &[&token_cache_key(chain_id, address)]);
        if let Some(cached) = Self::cached(cache, &cache_key).await {
            return Ok(Some(cached));
        }

        let result = client.price_by_address(chain_id, address).await?;
        Self::store(cache, &cache_key, result.as_ref()).await;
        Ok(result)
    }

    async fn cached(cache: Option<&Cache>, key: &str) -> Option<CoinPrice> {
        cache?.get::<CoinPrice>(key).await
    }

    async fn store(cache: Option<&Cache>, key: &str, price: Option<&CoinPrice>) {
        if let (Some(c), Some(price)) = (cache, price) {
            c.put(key, price, CacheTtl::PRICE).await;
        }
    }
}

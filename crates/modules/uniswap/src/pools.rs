use std::collections::HashSet;

use serde_json::json;
use tracing::{debug, warn};

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{is_evm_address, normalize_address, Pool};

use crate::queries::POOLS_FOR_TOKEN;
use crate::schema::{decode, PoolsData, RawPool};
use crate::{clamp_limit, UniswapModule};

impl UniswapModule {
    /// Pools containing `address` on either side, by TVL descending.
    /// Never fails: errors are logged and yield `[]`.
    pub async fn pools_for_token(&self, chain_id: u64, address: &str, limit: u32) -> Vec<Pool> {
        match self.try_pools_for_token(chain_id, address, limit).await {
            Ok(pools) => pools,
            Err(e) => {
                warn!(chain_id, address, error = %e, "pool lookup failed");
                Vec::new()
            }
        }
    }

    pub async fn try_pools_for_token(
        &self,
        chain_id: u64,
        address: &str,
        limit: u32,
    ) -> VaultoResult<Vec<Pool>> {
        if !self.supports_chain(chain_id) {
            return Err(VaultoError::UnsupportedChain(chain_id));
        }
        if !is_evm_address(address) {
            return Err(VaultoError::InvalidAddress(address.to_string()));
        }

        let token = normalize_address(address);
        let limit = clamp_limit(limit);
        let data = self
            .transport
            .execute(chain_id, POOLS_FOR_TOKEN, json!({ "token": token, "first": limit }))
            .await?;
        let found: PoolsData = decode(data, "pool lookup")?;
        let pools = merge_pool_rows(found.as_token0, found.as_token1, limit as usize);
        debug!(chain_id, token = %token, pools = pools.len(), "pool lookup");
        Ok(pools)
    }
}

pub(crate) fn merge_pool_rows(as_token0: Vec<RawPool>, as_token1: Vec<RawPool>, limit: usize) -> Vec<Pool> {
    let mut seen = HashSet::new();
    let mut pools: Vec<Pool> = as_token0
        .into_iter()
        .chain(as_token1)
        .map(Pool::from)
        .filter(|p| seen.insert(p.address.clone()))
        .collect();
    pools.sort_by(|a, b| b.tvl_usd.total_cmp(&a.tvl_usd));
    pools.truncate(limit);
    pools
}

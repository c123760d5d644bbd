//! `vaulto search | pools | token`: Uniswap v3 subgraph data.

use anyhow::Result;
use vaulto_types::output::{PoolsOutput, TokenSearchOutput};
use vaulto_utils::output::{render, OutputFormat};

use crate::factory;

pub async fn search(query: &str, chain_id: u64, limit: u32, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let tokens = market.uniswap.try_search_tokens(chain_id, query, limit).await?;
    render(
        fmt,
        &TokenSearchOutput {
            chain_id,
            query: query.trim().to_string(),
            tokens,
        },
    )
}

pub async fn pools(address: &str, chain_id: u64, limit: u32, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let pools = market.uniswap.try_pools_for_token(chain_id, address, limit).await?;
    render(
        fmt,
        &PoolsOutput {
            chain_id,
            address: address.trim().to_ascii_lowercase(),
            pools,
        },
    )
}

pub async fn token(address: &str, chain_id: u64, days: u32, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let details = market.token_details(chain_id, address, days).await?;
    render(fmt, &details)
}

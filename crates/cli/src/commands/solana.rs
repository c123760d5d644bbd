//! `vaulto market-cap | solana`: Jupiter data for Solana mints.

use anyhow::Result;
use vaulto_utils::output::{render, OutputFormat};

use crate::factory;

pub async fn market_cap(mint: &str, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    render(fmt, &market.market_cap(mint).await)
}

pub async fn token_data(mints: &[String], fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let data = market.solana_token_data(mints).await;
    render(fmt, &data)
}

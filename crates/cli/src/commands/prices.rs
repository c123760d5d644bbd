//! `vaulto price`: CoinGecko USD price by symbol or contract.

use anyhow::Result;
use vaulto_common::error::VaultoError;
use vaulto_utils::output::{render, OutputFormat};

use crate::factory;

/// What `vaulto price` was asked for.
pub enum PriceQuery {
    Symbol(String),
    Contract { chain_id: u64, address: String },
}

pub async fn price(query: PriceQuery, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let (found, label) = match &query {
        PriceQuery::Symbol(symbol) => (market.coingecko.price_by_symbol(symbol).await?, symbol.clone()),
        PriceQuery::Contract { chain_id, address } => (
            market.coingecko.price_by_address(*chain_id, address).await?,
            format!("{chain_id}:{address}"),
        ),
    };
    let price = found.ok_or(VaultoError::TokenNotFound(label))?;
    render(fmt, &price)
}

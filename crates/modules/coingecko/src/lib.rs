//! CoinGecko prices and token logos.

pub mod client;
pub mod symbols;

pub use client::{contract_platform, CoinGeckoClient};
pub use symbols::{coin_id_for_symbol, platform_for_chain};

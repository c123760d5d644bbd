//! Universal types shared across all data-source modules.
//!
//! Every module converts its source-specific rows into these types.
//! The backend and CLI consume only these: never raw subgraph or API structs.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Optimism,
    Bsc,
    Polygon,
    Base,
    Arbitrum,
}

impl Chain {
    /// Get the Chain enum from an EVM chain id.
    pub fn from_id(id: u64) -> Option<Chain> {
        match id {
            CHAIN_ETHEREUM => Some(Chain::Ethereum),
            CHAIN_OPTIMISM => Some(Chain::Optimism),
            CHAIN_BSC => Some(Chain::Bsc),
            CHAIN_POLYGON => Some(Chain::Polygon),
            CHAIN_BASE => Some(Chain::Base),
            CHAIN_ARBITRUM => Some(Chain::Arbitrum),
            _ => None,
        }
    }

    pub fn id(self) -> u64 {
        match self {
            Chain::Ethereum => CHAIN_ETHEREUM,
            Chain::Optimism => CHAIN_OPTIMISM,
            Chain::Bsc => CHAIN_BSC,
            Chain::Polygon => CHAIN_POLYGON,
            Chain::Base => CHAIN_BASE,
            Chain::Arbitrum => CHAIN_ARBITRUM,
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "ethereum"),
            Chain::Optimism => write!(f, "optimism"),
            Chain::Bsc => write!(f, "bsc"),
            Chain::Polygon => write!(f, "polygon"),
            Chain::Base => write!(f, "base"),
            Chain::Arbitrum => write!(f, "arbitrum"),
        }
    }
}

// ── Address helpers ─────────────────────────────────────────────────

/// Normalize an EVM address for comparison and keying: trimmed + lowercase.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// `0x` followed by exactly 40 hex digits (either case).
pub fn is_evm_address(address: &str) -> bool {
    let address = address.trim();
    match address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Cache key shared by every per-token cache: `{chainId}-{lowercased address}`.
pub fn token_cache_key(chain_id: u64, address: &str) -> String {
    format!("{chain_id}-{}", normalize_address(address))
}

/// Map NaN / infinities / negatives to `0.0`. USD aggregates are never negative
/// and absence is reported as zero.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ── Uniswap entities ────────────────────────────────────────────────

/// A token as indexed by the Uniswap v3 subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Lowercased contract address.
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    #[serde(rename = "derivedETH", skip_serializing_if = "Option::is_none", default)]
    pub derived_eth: Option<f64>,
    #[serde(rename = "derivedUSD", skip_serializing_if = "Option::is_none", default)]
    pub derived_usd: Option<f64>,
}

/// A Uniswap v3 liquidity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Lowercased pool address.
    pub address: String,
    /// Raw subgraph `feeTier` (500, 3000, 10000 …), reported verbatim.
    pub fee_tier_bps: u32,
    /// Raw u128 liquidity as a decimal string.
    pub liquidity: String,
    /// Raw sqrtPriceX96 as a decimal string.
    pub sqrt_price: String,
    pub tick: Option<i32>,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    pub token0: Token,
    pub token1: Token,
}

impl Pool {
    /// The side of this pool matching `address`, if any.
    pub fn side_for(&self, address: &str) -> Option<&Token> {
        let address = normalize_address(address);
        if self.token0.address == address {
            Some(&self.token0)
        } else if self.token1.address == address {
            Some(&self.token1)
        } else {
            None
        }
    }

    /// The side that is not `address`.
    pub fn counterpart_of(&self, address: &str) -> Option<&Token> {
        let address = normalize_address(address);
        if self.token0.address == address {
            Some(&self.token1)
        } else if self.token1.address == address {
            Some(&self.token0)
        } else {
            None
        }
    }
}

/// One day of per-token statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenDayData {
    /// Unix seconds at the start of the day (UTC).
    pub timestamp: i64,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    #[serde(rename = "feesUSD")]
    pub fees_usd: f64,
}

/// How a token's identity (symbol/name/decimals) was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityStrategy {
    /// Read from the matching side of the token's top pool.
    ViaPools,
    /// Read from the subgraph's `token(id:)` entity.
    Direct,
}

/// Where TVL / all-time volume figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsSource {
    /// The token entity itself.
    Token,
    /// Summed over the fetched pools (may undercount).
    PoolSums,
}

/// Which input produced a token's USD price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    DerivedUsd,
    DerivedEth,
    History,
    /// No usable price; callers display "N/A".
    Unavailable,
}

// ── Price / quote types ─────────────────────────────────────────────

/// Spot price snapshot from an aggregator (CoinGecko).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPrice {
    /// Aggregator coin id (e.g. `usd-coin`).
    pub id: String,
    pub symbol: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    #[serde(rename = "marketCapUSD", skip_serializing_if = "Option::is_none", default)]
    pub market_cap_usd: Option<f64>,
    #[serde(rename = "volume24hUSD", skip_serializing_if = "Option::is_none", default)]
    pub volume_24h_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub change_24h_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
}

/// Equity quote for a tokenized-stock ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub currency: Option<String>,
}

/// Daily OHLCV candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// ── Solana ──────────────────────────────────────────────────────────

/// Liquidity + 24h volume for a Solana mint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTokenStats {
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: Option<f64>,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
}

//! Source traits: the seams between compositions and concrete data sources.
//!
//! The core facade fans out over these, so a batch can be exercised against
//! in-memory sources without touching the network.

use async_trait::async_trait;

use crate::error::VaultoResult;
use crate::types::SolanaTokenStats;

/// Per-mint market data for Solana tokens.
#[async_trait]
pub trait SolanaMarketSource: Send + Sync {
    /// Liquidity and 24h volume for a mint. Errors when the upstream fails.
    async fn token_stats(&self, mint: &str) -> VaultoResult<SolanaTokenStats>;

    /// Pre-formatted market cap (`"$1.2B"`). `None` means unknown, never zero.
    async fn market_cap(&self, mint: &str) -> Option<String>;
}

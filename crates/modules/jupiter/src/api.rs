//! Jupiter token API (`/tokens/v2/search`).

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{non_negative, SolanaTokenStats};

const PROTOCOL: &str = "jupiter";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterToken {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    pub liquidity: Option<f64>,
    pub mcap: Option<f64>,
    pub usd_price: Option<f64>,
    pub stats24h: Option<JupiterStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterStats {
    pub buy_volume: Option<f64>,
    pub sell_volume: Option<f64>,
}

impl JupiterToken {
    /// Liquidity and buy + sell volume over 24h.
    pub fn stats(&self) -> SolanaTokenStats {
        let day = self.stats24h.clone().unwrap_or_default();
        SolanaTokenStats {
            tvl_usd: self.liquidity.map(non_negative),
            volume_usd: non_negative(day.buy_volume.unwrap_or(0.0))
                + non_negative(day.sell_volume.unwrap_or(0.0)),
        }
    }
}

pub struct JupiterClient {
    http: Client,
    api_base: String,
}

impl JupiterClient {
    pub fn new(api_base: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build Jupiter HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Search the token list; a mint query returns that mint.
    pub async fn search(&self, query: &str) -> VaultoResult<Vec<JupiterToken>> {
        let url = format!("{}/tokens/v2/search", self.api_base);
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VaultoError::ProtocolTimeout(format!("Jupiter token search timed out ({query})"))
                } else {
                    VaultoError::Network(format!("Jupiter token search failed: {e}"))
                }
            })?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(VaultoError::RateLimited("Jupiter token API 429".into()));
        }
        if !status.is_success() {
            return Err(VaultoError::protocol(PROTOCOL, format!("HTTP {status}")));
        }

        resp.json()
            .await
            .map_err(|e| VaultoError::Parse(format!("Jupiter token search: {e}")))
    }

    /// Liquidity and 24h volume for one mint. Mints are case-sensitive.
    pub async fn token_stats(&self, mint: &str) -> VaultoResult<SolanaTokenStats> {
        let mint = mint.trim();
        if mint.is_empty() {
            return Err(VaultoError::InvalidAddress(mint.to_string()));
        }
        let tokens = self.search(mint).await?;
        let token = tokens
            .iter()
            .find(|t| t.id == mint)
            .ok_or_else(|| VaultoError::TokenNotFound(mint.to_string()))?;

        let stats = token.stats();
        debug!(mint, symbol = %token.symbol, tvl = ?stats.tvl_usd, volume = stats.volume_usd, "Jupiter stats");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stats_sum_buy_and_sell() {
        let token: JupiterToken = serde_json::from_value(json!({
            "id": "XsDoVfqeBukxuZHWhdvWHBhgEHjGNst4MLodqsJHzoB",
            "symbol": "TSLAx",
            "liquidity": 2500000.5,
            "mcap": 9.1e9,
            "usdPrice": 430.1,
            "stats24h": { "buyVolume": 100.0, "sellVolume": 50.5, "priceChange": 1.2 }
        }))
        .unwrap();
        let stats = token.stats();
        assert_eq!(stats.tvl_usd, Some(2_500_000.5));
        assert_eq!(stats.volume_usd, 150.5);
    }

    #[test]
    fn test_stats_missing_fields() {
        let token: JupiterToken = serde_json::from_value(json!({ "id": "mint" })).unwrap();
        let stats = token.stats();
        assert_eq!(stats.tvl_usd, None);
        assert_eq!(stats.volume_usd, 0.0);
    }
}

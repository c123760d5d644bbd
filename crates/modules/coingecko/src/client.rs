//! CoinGecko API client: Demo/Pro tiers, no retries.
//!
//! Demo uses `x-cg-demo-api-key`, Pro uses `x-cg-pro-api-key`. An empty key
//! sends no auth header and works against the public API. A 429 surfaces as
//! [`VaultoError::RateLimited`] for the caller to handle.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use vaulto_common::constants::PRICE_CACHE_SECS;
use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{is_evm_address, normalize_address, CoinPrice};
use vaulto_types::config::{CoinGeckoConfig, CoinGeckoTier};

use crate::symbols::{coin_id_for_symbol, platform_for_chain};

const PROTOCOL: &str = "coingecko";

/// Image CoinGecko serves for coins without a logo.
const MISSING_IMAGE_MARKER: &str = "missing_";

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    api_key: String,
    tier: CoinGeckoTier,
    base_url_override: Option<String>,
}

// ── Response Types ──────────────────────────────────────────────────

/// One entry of `/simple/price` (vs `usd`).
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SimplePriceEntry {
    pub usd: Option<f64>,
    pub usd_market_cap: Option<f64>,
    pub usd_24h_vol: Option<f64>,
    pub usd_24h_change: Option<f64>,
}

/// `/coins/{platform}/contract/{address}`, trimmed to what we read.
#[derive(Deserialize, Debug, Clone)]
pub struct ContractCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<CoinImage>,
    pub market_data: Option<ContractMarketData>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CoinImage {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ContractMarketData {
    pub current_price: Option<serde_json::Value>,
    pub market_cap: Option<serde_json::Value>,
    pub total_volume: Option<serde_json::Value>,
    pub price_change_percentage_24h: Option<f64>,
}

fn usd_of(value: &Option<serde_json::Value>) -> Option<f64> {
    value
        .as_ref()
        .and_then(|v| v.get("usd"))
        .and_then(serde_json::Value::as_f64)
        .filter(|v| v.is_finite())
}

impl ContractCoin {
    /// Best available logo URL, skipping CoinGecko's placeholder.
    pub fn logo_url(&self) -> Option<String> {
        let image = self.image.as_ref()?;
        [&image.large, &image.small, &image.thumb]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty() && !url.contains(MISSING_IMAGE_MARKER))
            .cloned()
    }

    fn into_price(self) -> Option<CoinPrice> {
        let logo = self.logo_url();
        let market = self.market_data?;
        let price_usd = usd_of(&market.current_price).filter(|p| *p > 0.0)?;
        Some(CoinPrice {
            id: self.id,
            symbol: self.symbol.to_uppercase(),
            price_usd,
            market_cap_usd: usd_of(&market.market_cap),
            volume_24h_usd: usd_of(&market.total_volume),
            change_24h_pct: market.price_change_percentage_24h,
            image: logo,
        })
    }
}

/// Asset platform for a contract lookup, `None` for chains CoinGecko has
/// no platform for. The address ends up in a URL path, so anything but a
/// well-formed EVM address is rejected.
pub fn contract_platform(chain_id: u64, address: &str) -> VaultoResult<Option<&'static str>> {
    if !is_evm_address(address) {
        return Err(VaultoError::InvalidAddress(address.trim().to_string()));
    }
    Ok(platform_for_chain(chain_id))
}

impl CoinGeckoClient {
    pub fn new(config: &CoinGeckoConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build CoinGecko HTTP client");

        Self {
            http,
            api_key: config.api_key.trim().to_string(),
            tier: config.tier,
            base_url_override: config
                .base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Base URL for the CoinGecko v3 API.
    fn base_url(&self) -> &str {
        if let Some(url) = &self.base_url_override {
            return url;
        }
        match self.tier {
            CoinGeckoTier::Demo => "https://api.coingecko.com/api/v3",
            CoinGeckoTier::Pro => "https://pro-api.coingecko.com/api/v3",
        }
    }

    /// Auth header name.
    fn auth_header(&self) -> &str {
        match self.tier {
            CoinGeckoTier::Demo => "x-cg-demo-api-key",
            CoinGeckoTier::Pro => "x-cg-pro-api-key",
        }
    }

    /// GET and decode. `Ok(None)` on 404.
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> VaultoResult<Option<T>> {
        let url = format!("{}{}", self.base_url(), path);
        let mut req = self
            .http
            .get(&url)
            .header(
                reqwest::header::CACHE_CONTROL,
                format!("max-age={PRICE_CACHE_SECS}"),
            )
            .query(query);
        if !self.api_key.is_empty() {
            req = req.header(self.auth_header(), &self.api_key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                VaultoError::ProtocolTimeout(format!("CoinGecko {path} timed out"))
            } else {
                VaultoError::Network(format!("CoinGecko request failed: {e}"))
            }
        })?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!(path, "CoinGecko 404");
                return Ok(None);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(VaultoError::RateLimited(format!("CoinGecko 429 on {path}")));
            }
            status if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                return Err(VaultoError::protocol(PROTOCOL, format!("HTTP {status}: {snippet}")));
            }
            _ => {}
        }

        let parsed = resp
            .json::<T>()
            .await
            .map_err(|e| VaultoError::Parse(format!("CoinGecko {path}: {e}")))?;
        Ok(Some(parsed))
    }

    // ── Simple ──────────────────────────────────────────────────

    /// `/simple/price` in USD with market cap, 24h volume and 24h change.
    pub async fn simple_price(&self, ids: &[&str]) -> VaultoResult<HashMap<String, SimplePriceEntry>> {
        let ids = ids.join(",");
        let query = [
            ("ids", ids.as_str()),
            ("vs_currencies", "usd"),
            ("include_market_cap", "true"),
            ("include_24hr_vol", "true"),
            ("include_24hr_change", "true"),
        ];
        Ok(self.get("/simple/price", &query).await?.unwrap_or_default())
    }

    // ── Coins ───────────────────────────────────────────────────

    /// Coin data by contract address on an asset platform.
    pub async fn coin_by_contract(&self, platform: &str, address: &str) -> VaultoResult<Option<ContractCoin>> {
        if !is_evm_address(address) {
            return Err(VaultoError::InvalidAddress(address.trim().to_string()));
        }
        let path = format!("/coins/{platform}/contract/{}", normalize_address(address));
        let query = [
            ("localization", "false"),
            ("tickers", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
        ];
        self.get(&path, &query).await
    }

    // ── Compositions ────────────────────────────────────────────

    /// Price for a listed symbol. Unknown symbols and unpriced coins are `Ok(None)`.
    pub async fn price_by_symbol(&self, symbol: &str) -> VaultoResult<Option<CoinPrice>> {
        let Some((canonical, id)) = coin_id_for_symbol(symbol) else {
            debug!(symbol, "no CoinGecko id for symbol");
            return Ok(None);
        };

        let mut prices = self.simple_price(&[id]).await?;
        let Some(entry) = prices.remove(id) else {
            return Ok(None);
        };
        let Some(price_usd) = entry.usd.filter(|p| p.is_finite() && *p > 0.0) else {
            return Ok(None);
        };

        Ok(Some(CoinPrice {
            id: id.to_string(),
            symbol: canonical.to_string(),
            price_usd,
            market_cap_usd: entry.usd_market_cap,
            volume_24h_usd: entry.usd_24h_vol,
            change_24h_pct: entry.usd_24h_change,
            image: None,
        }))
    }

    /// Price for a contract on an EVM chain. Unknown chains and unlisted
    /// contracts are `Ok(None)`; a malformed address is `InvalidAddress`.
    pub async fn price_by_address(&self, chain_id: u64, address: &str) -> VaultoResult<Option<CoinPrice>> {
        let Some(platform) = contract_platform(chain_id, address)? else {
            return Ok(None);
        };
        Ok(self
            .coin_by_contract(platform, address)
            .await?
            .and_then(ContractCoin::into_price))
    }

    /// Logo URL for a contract, if CoinGecko has one.
    pub async fn logo_by_address(&self, chain_id: u64, address: &str) -> VaultoResult<Option<String>> {
        let Some(platform) = contract_platform(chain_id, address)? else {
            return Ok(None);
        };
        Ok(self
            .coin_by_contract(platform, address)
            .await?
            .and_then(|coin| coin.logo_url()))
    }
}

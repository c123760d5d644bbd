//! Response shapes shared by the HTTP API and the CLI's JSON output.
//!
//! Field names follow the front end's casing (`tvlUSD`, `priceUSD`, camelCase
//! elsewhere) so the structs serialize directly into route bodies.

use serde::{Deserialize, Serialize};

use vaulto_common::types::{
    Candle, IdentityStrategy, Pool, PriceSource, StatsSource, StockQuote, Token, TokenDayData,
};

// ── Liquidity search ────────────────────────────────────────────────

/// One search hit with the pools it trades in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityTokenResult {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: f64,
    /// Most recent day's volume.
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    pub pools: Vec<Pool>,
}

impl LiquidityTokenResult {
    pub fn new(token: Token, pools: Vec<Pool>) -> Self {
        Self {
            address: token.address,
            symbol: token.symbol,
            name: token.name,
            decimals: token.decimals,
            tvl_usd: token.tvl_usd,
            volume_usd: token.volume_usd,
            pools,
        }
    }
}

/// `POST /api/uniswap/liquidity` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityResponse {
    pub chain_id: u64,
    pub tokens: Vec<LiquidityTokenResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ── Token details ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

/// A single `(timestamp, value)` chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: i64,
    pub value: f64,
}

/// `GET /api/uniswap/token-details` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetailsApiResponse {
    pub chain_id: u64,
    pub token: TokenInfo,
    pub identity_source: IdentityStrategy,
    pub stats_source: StatsSource,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    pub price_source: PriceSource,
    /// `"N/A"` when no price could be resolved.
    pub price_formatted: String,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: f64,
    /// All-time volume.
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    /// Most recent day's volume.
    #[serde(rename = "volume24hUSD")]
    pub volume_24h_usd: f64,
    pub price_history: Vec<HistoryPoint>,
    pub tvl_history: Vec<HistoryPoint>,
    pub volume_history: Vec<HistoryPoint>,
    pub pools: Vec<Pool>,
}

impl TokenDetailsApiResponse {
    /// Split day-data rows into the three chart series.
    pub fn split_history(
        history: &[TokenDayData],
    ) -> (Vec<HistoryPoint>, Vec<HistoryPoint>, Vec<HistoryPoint>) {
        let point = |timestamp, value| HistoryPoint { timestamp, value };
        let prices = history.iter().map(|d| point(d.timestamp, d.price_usd)).collect();
        let tvl = history.iter().map(|d| point(d.timestamp, d.tvl_usd)).collect();
        let volume = history.iter().map(|d| point(d.timestamp, d.volume_usd)).collect();
        (prices, tvl, volume)
    }
}

// ── Solana batch ────────────────────────────────────────────────────

/// One entry of `POST /api/solana/token-data`.
///
/// A failed lookup serializes as exactly `{address, volumeUSD: 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTokenData {
    pub address: String,
    #[serde(rename = "tvlUSD", skip_serializing_if = "Option::is_none", default)]
    pub tvl_usd: Option<f64>,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub market_cap_formatted: Option<String>,
}

impl SolanaTokenData {
    /// The zeroed record used when a lookup fails.
    pub fn empty(address: &str) -> Self {
        Self {
            address: address.to_string(),
            tvl_usd: None,
            volume_usd: 0.0,
            market_cap: None,
            market_cap_formatted: None,
        }
    }
}

// ── Stock data ──────────────────────────────────────────────────────

/// `GET /api/token/:address/stock-data` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDataResponse {
    pub ticker: String,
    pub quote: StockQuote,
    pub history: Vec<Candle>,
}

// ── Location / logos ────────────────────────────────────────────────

/// `GET /api/check-location` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub is_restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl LocationResponse {
    /// Fail-open answer: not restricted, with the reason attached.
    pub fn unrestricted_on_error(error: impl Into<String>) -> Self {
        Self {
            is_restricted: false,
            country_code: None,
            error: Some(error.into()),
        }
    }
}

/// `GET /api/token-logo` response; `logoUrl` is `null` when none is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoResponse {
    pub chain_id: u64,
    pub address: String,
    pub logo_url: Option<String>,
}

// ── CLI-only outputs ────────────────────────────────────────────────

/// `vaulto search` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSearchOutput {
    pub chain_id: u64,
    pub query: String,
    pub tokens: Vec<Token>,
}

/// `vaulto pools` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsOutput {
    pub chain_id: u64,
    pub address: String,
    pub pools: Vec<Pool>,
}

/// `vaulto market-cap` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCapOutput {
    pub address: String,
    pub market_cap: Option<f64>,
    pub market_cap_formatted: Option<String>,
}

/// `vaulto cache-logos` summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoCacheReport {
    pub total: usize,
    pub resolved: usize,
    pub missing: usize,
    pub failed: usize,
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_solana_entry_shape() {
        let json = serde_json::to_value(SolanaTokenData::empty("So11111111111111111111111111111111111111112")).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["address"], "So11111111111111111111111111111111111111112");
        assert_eq!(json["volumeUSD"], 0.0);
    }

    #[test]
    fn test_location_fail_open() {
        let resp = LocationResponse::unrestricted_on_error("geo lookup failed");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["isRestricted"], false);
        assert!(json.get("countryCode").is_none());
        assert_eq!(json["error"], "geo lookup failed");
    }

    #[test]
    fn test_logo_response_keeps_null() {
        let resp = LogoResponse {
            chain_id: 1,
            address: "0xabc".into(),
            logo_url: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("logoUrl").unwrap().is_null());
    }

    #[test]
    fn test_split_history() {
        let rows = vec![
            TokenDayData { timestamp: 1, price_usd: 2.0, tvl_usd: 3.0, volume_usd: 4.0, fees_usd: 0.1 },
            TokenDayData { timestamp: 2, price_usd: 5.0, tvl_usd: 6.0, volume_usd: 7.0, fees_usd: 0.2 },
        ];
        let (prices, tvl, volume) = TokenDetailsApiResponse::split_history(&rows);
        assert_eq!(prices[1], HistoryPoint { timestamp: 2, value: 5.0 });
        assert_eq!(tvl[0].value, 3.0);
        assert_eq!(volume.len(), 2);
    }
}

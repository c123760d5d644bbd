use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vaulto_common::constants::*;

// ═══════════════════════════════════════════════════════════════════════
//  APP CONFIG: top-level, stored at ~/.vaulto/config.toml
// ═══════════════════════════════════════════════════════════════════════

/// Top-level configuration stored in `$HOME/.vaulto/config.toml`.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 3001
///
/// [subgraph]
/// gateway_url = "https://gateway.thegraph.com/api"
/// api_key = "…"
/// timeout_secs = 10
///
/// [subgraph.endpoints]
/// "1" = "http://localhost:8000/subgraphs/name/uniswap-v3"
///
/// [coingecko]
/// tier = "demo"
/// api_key = ""
///
/// [stocks.tickers]
/// "0x…" = "TSLA"
/// ```
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub subgraph: SubgraphConfig,
    pub coingecko: CoinGeckoConfig,
    pub jupiter: JupiterConfig,
    pub yahoo: YahooConfig,
    pub geo: GeoConfig,
    pub pricing: PricingConfig,
    pub stocks: StocksConfig,
    pub logos: LogoConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubgraphConfig {
    /// Gateway base; the full URL is `{gateway_url}/{api_key}/subgraphs/id/{id}`.
    pub gateway_url: String,
    /// The Graph API key. Required unless every used chain has an endpoint override.
    pub api_key: String,
    pub timeout_secs: u64,
    /// Per-chain endpoint overrides, keyed by chain id as a string (TOML keys).
    pub endpoints: HashMap<String, String>,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            gateway_url: THE_GRAPH_GATEWAY.into(),
            api_key: String::new(),
            timeout_secs: SUBGRAPH_TIMEOUT_SECS,
            endpoints: HashMap::new(),
        }
    }
}

impl SubgraphConfig {
    /// Endpoint override for a chain, if configured.
    pub fn endpoint_override(&self, chain_id: u64) -> Option<&str> {
        self.endpoints.get(&chain_id.to_string()).map(String::as_str)
    }
}

/// CoinGecko API tier: determines base URL and auth header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinGeckoTier {
    /// Demo (free) API: api.coingecko.com/api/v3
    #[default]
    Demo,
    /// Pro (paid) API: pro-api.coingecko.com/api/v3
    Pro,
}

impl std::str::FromStr for CoinGeckoTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" | "free" => Ok(CoinGeckoTier::Demo),
            "pro" => Ok(CoinGeckoTier::Pro),
            other => Err(format!("unknown CoinGecko tier '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinGeckoConfig {
    pub tier: CoinGeckoTier,
    /// Empty key uses the public, unauthenticated API.
    pub api_key: String,
    /// Override the tier's base URL (self-hosted proxy, tests).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JupiterConfig {
    /// Token pages scraped for market cap: `{page_base}/{mint}`.
    pub page_base: String,
    /// Jupiter token API base.
    pub api_base: String,
}

impl Default for JupiterConfig {
    fn default() -> Self {
        Self {
            page_base: JUPITER_TOKEN_PAGE_BASE.into(),
            api_base: JUPITER_API_BASE.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_FINANCE_BASE.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub base_url: String,
    /// ISO 3166-1 alpha-2 codes that may not use the swap.
    pub restricted_countries: Vec<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: GEO_API_BASE.into(),
            restricted_countries: ["US", "CU", "IR", "KP", "SY"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl GeoConfig {
    pub fn is_restricted(&self, country_code: &str) -> bool {
        self.restricted_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country_code.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// ETH/USD used to convert `derivedETH` prices.
    pub assumed_eth_price_usd: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            assumed_eth_price_usd: DEFAULT_ETH_PRICE_USD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StocksConfig {
    /// Tokenized-stock contract/mint address → equity ticker.
    pub tickers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// JSON file written by `vaulto cache-logos`, loaded at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<String>,
    /// Resolve unknown logos through CoinGecko on first request.
    pub resolve_on_miss: bool,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            resolve_on_miss: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis URL; no URL means no response cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl AppConfig {
    /// Serialize to a TOML string for writing to disk.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Overlay secrets and deployment knobs from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("THE_GRAPH_API_KEY") {
            self.subgraph.api_key = key;
        }
        if let Some(key) = non_empty("COINGECKO_API_KEY") {
            self.coingecko.api_key = key;
        }
        if let Some(tier) = non_empty("COINGECKO_TIER").and_then(|t| t.parse().ok()) {
            self.coingecko.tier = tier;
        }
        if let Some(url) = non_empty("REDIS_URL") {
            self.cache.redis_url = Some(url);
        }
        if let Some(port) = non_empty("VAULTO_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Overlay from the process environment.
    pub fn apply_env_vars(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }
}

//! Universal constants for Vaulto.

/// EVM chain ids the aggregation layer knows about.
pub const CHAIN_ETHEREUM: u64 = 1;
pub const CHAIN_OPTIMISM: u64 = 10;
pub const CHAIN_BSC: u64 = 56;
pub const CHAIN_POLYGON: u64 = 137;
pub const CHAIN_BASE: u64 = 8453;
pub const CHAIN_ARBITRUM: u64 = 42161;

/// The Graph decentralized gateway.
pub const THE_GRAPH_GATEWAY: &str = "https://gateway.thegraph.com/api";

/// Uniswap v3 subgraph deployment ids on The Graph, per chain.
pub const UNISWAP_V3_SUBGRAPHS: &[(u64, &str)] = &[
    (CHAIN_ETHEREUM, "5zvR82QoaXYFyDEKLZ9t6v9adgnptxYpKpSbxtgVENFV"),
    (CHAIN_OPTIMISM, "Cghf4LfVqPiFw6fp6Y5X5Ubc8UpmUhSfJL82zwiBFLaj"),
    (CHAIN_POLYGON, "3hCPRGf4z88VC5rsBKU5AA9FBBq5nF3jbKJG7VZCbhjm"),
    (CHAIN_BASE, "43Hwfi3dJSoGpyas9VkK2E9DiKpweh7jijkRBhWGwHJK"),
    (CHAIN_ARBITRUM, "FbCGRftH4a3yZugY7TnbYgPJVEv2LvMT6oF1fxPe9aJM"),
];

/// Subgraph deployment id for a chain, if Uniswap v3 is indexed there.
pub fn uniswap_subgraph_id(chain_id: u64) -> Option<&'static str> {
    UNISWAP_V3_SUBGRAPHS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, subgraph)| *subgraph)
}

/// Subgraph request timeout in seconds.
pub const SUBGRAPH_TIMEOUT_SECS: u64 = 10;

/// Upper bound for `first:` on search and pool queries.
pub const MAX_QUERY_LIMIT: u32 = 100;

/// Rows per `tokenDayDatas` page.
pub const DAY_DATA_PAGE_SIZE: u32 = 1000;

/// Pagination stops once `skip` reaches this many rows.
pub const DAY_DATA_MAX_SKIP: u32 = 10_000;

/// History windows are clamped to `1..=MAX_HISTORY_DAYS` days.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Most mints accepted by one Solana token-data request.
pub const MAX_SOLANA_BATCH: usize = 50;

/// ETH/USD used to convert `derivedETH` when no USD price is indexed.
pub const DEFAULT_ETH_PRICE_USD: f64 = 3000.0;

/// Cache hint applied to price lookups (seconds).
pub const PRICE_CACHE_SECS: u64 = 60;

/// Default backend port.
pub const DEFAULT_SERVER_PORT: u16 = 3001;

/// Jupiter public endpoints.
pub const JUPITER_TOKEN_PAGE_BASE: &str = "https://jup.ag/tokens";
pub const JUPITER_API_BASE: &str = "https://lite-api.jup.ag";

/// Yahoo Finance chart API.
pub const YAHOO_FINANCE_BASE: &str = "https://query1.finance.yahoo.com";

/// ipapi-compatible geolocation endpoint.
pub const GEO_API_BASE: &str = "https://ipapi.co";

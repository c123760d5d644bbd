//! Symbol → CoinGecko id, and chain id → CoinGecko asset platform.

use vaulto_common::constants::*;

/// Crypto tokens the swap lists, keyed by their display symbol.
pub const SYMBOL_IDS: &[(&str, &str)] = &[
    // Majors
    ("ETH", "ethereum"),
    ("WETH", "weth"),
    ("BTC", "bitcoin"),
    ("WBTC", "wrapped-bitcoin"),
    ("cbBTC", "coinbase-wrapped-btc"),
    ("SOL", "solana"),
    ("POL", "polygon-ecosystem-token"),
    ("MATIC", "polygon-ecosystem-token"),
    ("ARB", "arbitrum"),
    ("OP", "optimism"),
    ("UNI", "uniswap"),
    ("LINK", "chainlink"),
    ("JUP", "jupiter-exchange-solana"),
    // Stablecoins
    ("USDC", "usd-coin"),
    ("USDT", "tether"),
    ("DAI", "dai"),
    ("USDe", "ethena-usde"),
    ("PYUSD", "paypal-usd"),
    ("FRAX", "frax"),
    ("GHO", "gho"),
    ("USDS", "usds"),
    ("EURC", "euro-coin"),
];

/// Equities behind the listed tokenized stocks, keyed by ticker.
///
/// An xStock (`TSLAx`) prices as its underlying equity, so both the bare
/// ticker and the `x`-suffixed symbol resolve through this table.
pub const EQUITY_IDS: &[(&str, &str)] = &[
    ("TSLA", "tesla-xstock"),
    ("AAPL", "apple-xstock"),
    ("NVDA", "nvidia-xstock"),
    ("MSFT", "microsoft-xstock"),
    ("AMZN", "amazon-xstock"),
    ("GOOGL", "alphabet-xstock"),
    ("META", "meta-xstock"),
    ("COIN", "coinbase-xstock"),
    ("MSTR", "microstrategy-xstock"),
    ("HOOD", "robinhood-xstock"),
    ("CRCL", "circle-xstock"),
    ("SPY", "sp500-xstock"),
    ("QQQ", "nasdaq-xstock"),
];

fn lookup(table: &[(&'static str, &'static str)], symbol: &str) -> Option<(&'static str, &'static str)> {
    table.iter().find(|(s, _)| s.eq_ignore_ascii_case(symbol)).copied()
}

/// CoinGecko id for a symbol, case-insensitive. Returns the canonical
/// symbol alongside the id; for an xStock that is the underlying ticker.
pub fn coin_id_for_symbol(symbol: &str) -> Option<(&'static str, &'static str)> {
    let symbol = symbol.trim();
    if let Some(hit) = lookup(SYMBOL_IDS, symbol).or_else(|| lookup(EQUITY_IDS, symbol)) {
        return Some(hit);
    }
    let ticker = symbol
        .strip_suffix('x')
        .or_else(|| symbol.strip_suffix('X'))
        .filter(|t| !t.is_empty())?;
    lookup(EQUITY_IDS, ticker)
}

/// CoinGecko asset platform id for an EVM chain.
pub fn platform_for_chain(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        CHAIN_ETHEREUM => Some("ethereum"),
        CHAIN_OPTIMISM => Some("optimistic-ethereum"),
        CHAIN_BSC => Some("binance-smart-chain"),
        CHAIN_POLYGON => Some("polygon-pos"),
        CHAIN_BASE => Some("base"),
        CHAIN_ARBITRUM => Some("arbitrum-one"),
        _ => None,
    }
}

//! GraphQL documents sent to the Uniswap v3 subgraph.
//!
//! Numeric fields come back as decimal strings; see [`crate::schema`].

/// Case-insensitive substring search on symbol OR name. The subgraph has no
/// `or` filter, so two aliased selections run in one request.
pub const SEARCH_TOKENS: &str = r#"
query SearchTokens($query: String!, $first: Int!) {
  bySymbol: tokens(
    first: $first
    where: { symbol_contains_nocase: $query }
    orderBy: totalValueLockedUSD
    orderDirection: desc
  ) {
    id
    symbol
    name
    decimals
    totalValueLockedUSD
    volumeUSD
    tokenDayData(first: 1, orderBy: date, orderDirection: desc) {
      volumeUSD
    }
  }
  byName: tokens(
    first: $first
    where: { name_contains_nocase: $query }
    orderBy: totalValueLockedUSD
    orderDirection: desc
  ) {
    id
    symbol
    name
    decimals
    totalValueLockedUSD
    volumeUSD
    tokenDayData(first: 1, orderBy: date, orderDirection: desc) {
      volumeUSD
    }
  }
}
"#;

/// Pools where the token sits on either side.
pub const POOLS_FOR_TOKEN: &str = r#"
query PoolsForToken($token: String!, $first: Int!) {
  asToken0: pools(
    first: $first
    where: { token0: $token }
    orderBy: totalValueLockedUSD
    orderDirection: desc
  ) {
    id
    feeTier
    liquidity
    sqrtPrice
    tick
    totalValueLockedUSD
    volumeUSD
    token0 { id symbol name decimals }
    token1 { id symbol name decimals }
  }
  asToken1: pools(
    first: $first
    where: { token1: $token }
    orderBy: totalValueLockedUSD
    orderDirection: desc
  ) {
    id
    feeTier
    liquidity
    sqrtPrice
    tick
    totalValueLockedUSD
    volumeUSD
    token0 { id symbol name decimals }
    token1 { id symbol name decimals }
  }
}
"#;

/// Identity only.
pub const TOKEN_BY_ID: &str = r#"
query TokenById($id: ID!) {
  token(id: $id) {
    id
    symbol
    name
    decimals
  }
}
"#;

/// Identity plus aggregate stats and the ETH-denominated price.
pub const TOKEN_FULL: &str = r#"
query TokenFull($id: ID!) {
  token(id: $id) {
    id
    symbol
    name
    decimals
    totalValueLockedUSD
    volumeUSD
    derivedETH
  }
}
"#;

/// One page of daily stats, oldest first.
pub const TOKEN_DAY_DATA: &str = r#"
query TokenDayData($token: String!, $since: Int!, $first: Int!, $skip: Int!) {
  tokenDayDatas(
    first: $first
    skip: $skip
    where: { token: $token, date_gte: $since }
    orderBy: date
    orderDirection: asc
  ) {
    date
    priceUSD
    totalValueLockedUSD
    volumeUSD
    feesUSD
  }
}
"#;

/// The operation name of a document (`query SearchTokens(...)` → `SearchTokens`).
pub fn operation_name(query: &str) -> Option<&str> {
    let rest = query.trim_start().strip_prefix("query")?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

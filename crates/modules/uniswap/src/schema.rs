//! Raw subgraph rows and their conversion into the shared domain types.
//!
//! The subgraph encodes `BigDecimal`/`BigInt` as strings. Every numeric field
//! here is parsed leniently: absent, unparsable and non-finite values become 0
//! so one bad row never fails a whole response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{non_negative, normalize_address, Pool, Token, TokenDayData};

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// USD aggregate: string or number, clamped to a finite non-negative value.
fn usd<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(non_negative(raw.as_ref().and_then(value_as_f64).unwrap_or(0.0)))
}

/// Like [`usd`], but keeps "field absent" distinct from zero.
fn opt_usd<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw
        .filter(|v| !v.is_null())
        .map(|v| non_negative(value_as_f64(&v).unwrap_or(0.0))))
}

fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .unwrap_or(0))
}

fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

/// Big integers (liquidity, sqrtPrice) stay as decimal strings.
fn big_int<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDayVolume {
    #[serde(default, deserialize_with = "usd")]
    pub volume_usd: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "int")]
    pub decimals: i64,
    #[serde(rename = "totalValueLockedUSD", default, deserialize_with = "usd")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD", default, deserialize_with = "usd")]
    pub volume_usd: f64,
    #[serde(rename = "derivedETH", default, deserialize_with = "opt_usd")]
    pub derived_eth: Option<f64>,
    #[serde(rename = "derivedUSD", default, deserialize_with = "opt_usd")]
    pub derived_usd: Option<f64>,
    /// Present on search rows only: the most recent day first.
    #[serde(default)]
    pub token_day_data: Vec<RawDayVolume>,
}

impl RawToken {
    /// Volume of the most recent indexed day, else 0.
    pub fn latest_day_volume(&self) -> f64 {
        self.token_day_data.first().map(|d| d.volume_usd).unwrap_or(0.0)
    }
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Token {
            address: normalize_address(&raw.id),
            symbol: raw.symbol,
            name: raw.name,
            decimals: u8::try_from(raw.decimals).unwrap_or(0),
            tvl_usd: raw.tvl_usd,
            volume_usd: raw.volume_usd,
            derived_eth: raw.derived_eth,
            derived_usd: raw.derived_usd,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    pub id: String,
    #[serde(default, deserialize_with = "int")]
    pub fee_tier: i64,
    #[serde(default, deserialize_with = "big_int")]
    pub liquidity: String,
    #[serde(default, deserialize_with = "big_int")]
    pub sqrt_price: String,
    #[serde(default, deserialize_with = "opt_int")]
    pub tick: Option<i64>,
    #[serde(rename = "totalValueLockedUSD", default, deserialize_with = "usd")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD", default, deserialize_with = "usd")]
    pub volume_usd: f64,
    pub token0: RawToken,
    pub token1: RawToken,
}

impl From<RawPool> for Pool {
    fn from(raw: RawPool) -> Self {
        Pool {
            address: normalize_address(&raw.id),
            fee_tier_bps: u32::try_from(raw.fee_tier).unwrap_or(0),
            liquidity: raw.liquidity,
            sqrt_price: raw.sqrt_price,
            tick: raw.tick.and_then(|t| i32::try_from(t).ok()),
            tvl_usd: raw.tvl_usd,
            volume_usd: raw.volume_usd,
            token0: raw.token0.into(),
            token1: raw.token1.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDayData {
    #[serde(default, deserialize_with = "int")]
    pub date: i64,
    #[serde(rename = "priceUSD", default, deserialize_with = "usd")]
    pub price_usd: f64,
    #[serde(rename = "totalValueLockedUSD", default, deserialize_with = "usd")]
    pub tvl_usd: f64,
    #[serde(rename = "volumeUSD", default, deserialize_with = "usd")]
    pub volume_usd: f64,
    #[serde(rename = "feesUSD", default, deserialize_with = "usd")]
    pub fees_usd: f64,
}

impl From<RawDayData> for TokenDayData {
    fn from(raw: RawDayData) -> Self {
        TokenDayData {
            timestamp: raw.date,
            price_usd: raw.price_usd,
            tvl_usd: raw.tvl_usd,
            volume_usd: raw.volume_usd,
            fees_usd: raw.fees_usd,
        }
    }
}

// ── Response envelopes (the `data` object) ─────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    #[serde(default)]
    pub by_symbol: Vec<RawToken>,
    #[serde(default)]
    pub by_name: Vec<RawToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsData {
    #[serde(default)]
    pub as_token0: Vec<RawPool>,
    #[serde(default)]
    pub as_token1: Vec<RawPool>,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub token: Option<RawToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDataPage {
    #[serde(default)]
    pub token_day_datas: Vec<RawDayData>,
}

/// Decode a `data` object into one of the envelopes above.
pub fn decode<T: serde::de::DeserializeOwned>(data: Value, what: &str) -> VaultoResult<T> {
    serde_json::from_value(data).map_err(|e| VaultoError::Parse(format!("{what}: {e}")))
}

//! Redis cache layer: TTL-based caching for upstream responses.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use vaulto_common::constants::PRICE_CACHE_SECS;

/// Shared Redis connection. Optional: the server runs without it.
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
}

/// TTL per cached payload.
pub struct CacheTtl;

impl CacheTtl {
    /// CoinGecko prices.
    pub const PRICE: Duration = Duration::from_secs(PRICE_CACHE_SECS);
    /// Stock quotes; the daily candles change slowly.
    pub const STOCK: Duration = Duration::from_secs(300);
}

impl Cache {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Cached JSON value under `key`. Redis or decode failures are misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                return None;
            }
        };
        let value = serde_json::from_str(&raw?).ok();
        if value.is_some() {
            debug!("cache HIT {key}");
        }
        value
    }

    /// Store `value` as JSON for `ttl`. A failed write is logged, never raised.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "cache value not serializable");
                return;
            }
        };
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        match conn.set_ex::<_, _, ()>(key, json, ttl_secs).await {
            Ok(()) => debug!("cache SET {key} (ttl={ttl_secs}s)"),
            Err(e) => warn!(key, error = %e, "cache write failed"),
        }
    }

    /// `vaulto:{namespace}:{part}:{part}...`
    pub fn key(namespace: &str, parts: &[&str]) -> String {
        format!("vaulto:{}:{}", namespace, parts.join(":"))
    }
}

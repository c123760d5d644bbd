//! In-memory subgraph for tests.
//!
//! A handler receives the operation name (`SearchTokens`, `PoolsForToken`, …)
//! and the variables, and returns the `data` object the real subgraph would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use vaulto_common::constants::uniswap_subgraph_id;
use vaulto_common::error::{VaultoError, VaultoResult};

use crate::client::SubgraphTransport;
use crate::queries::operation_name;

type Handler = dyn Fn(&str, &Value) -> VaultoResult<Value> + Send + Sync;

pub struct MockSubgraph {
    handler: Box<Handler>,
    calls: AtomicUsize,
    log: Mutex<Vec<(String, Value)>>,
}

impl MockSubgraph {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> VaultoResult<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Total requests served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests for one operation.
    pub fn calls_to(&self, operation: &str) -> usize {
        self.log
            .lock()
            .map(|log| log.iter().filter(|(op, _)| op == operation).count())
            .unwrap_or(0)
    }

    /// Variables of every request for one operation, in order.
    pub fn variables_for(&self, operation: &str) -> Vec<Value> {
        self.log
            .lock()
            .map(|log| {
                log.iter()
                    .filter(|(op, _)| op == operation)
                    .map(|(_, vars)| vars.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubgraphTransport for MockSubgraph {
    fn supports_chain(&self, chain_id: u64) -> bool {
        uniswap_subgraph_id(chain_id).is_some()
    }

    async fn execute(&self, chain_id: u64, query: &str, variables: Value) -> VaultoResult<Value> {
        if !self.supports_chain(chain_id) {
            return Err(VaultoError::UnsupportedChain(chain_id));
        }
        let op = operation_name(query).unwrap_or("anonymous").to_string();
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.log.lock() {
            log.push((op.clone(), variables.clone()));
        }
        (self.handler)(&op, &variables)
    }
}

// ── Row builders, in the subgraph's string-encoded shape ───────────

pub fn token_row(id: &str, symbol: &str, name: &str, tvl: &str, day_volume: Option<&str>) -> Value {
    let day_data = match day_volume {
        Some(v) => json!([{ "volumeUSD": v }]),
        None => json!([]),
    };
    json!({
        "id": id,
        "symbol": symbol,
        "name": name,
        "decimals": "18",
        "totalValueLockedUSD": tvl,
        "volumeUSD": "0",
        "tokenDayData": day_data,
    })
}

pub fn pool_row(id: &str, fee_tier: &str, tvl: &str, token0: (&str, &str), token1: (&str, &str)) -> Value {
    json!({
        "id": id,
        "feeTier": fee_tier,
        "liquidity": "1000000",
        "sqrtPrice": "79228162514264337593543950336",
        "tick": "0",
        "totalValueLockedUSD": tvl,
        "volumeUSD": "1000",
        "token0": { "id": token0.0, "symbol": token0.1, "name": token0.1, "decimals": "6" },
        "token1": { "id": token1.0, "symbol": token1.1, "name": token1.1, "decimals": "18" },
    })
}

pub fn day_row(date: i64, price: &str, volume: &str) -> Value {
    json!({
        "date": date,
        "priceUSD": price,
        "totalValueLockedUSD": "1000",
        "volumeUSD": volume,
        "feesUSD": "1",
    })
}

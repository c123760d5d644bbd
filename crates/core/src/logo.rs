//! Token logo cache.
//!
//! Keys are `"{chainId}-{lowercased address}"`. A `None` value is a cached
//! miss: the source was asked and had no logo, so it is not asked again.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vaulto_common::error::VaultoResult;
use vaulto_common::types::{is_evm_address, token_cache_key};
use vaulto_mod_coingecko::{contract_platform, CoinGeckoClient};
use vaulto_types::config::LogoConfig;

/// Where logos come from on a cache miss.
#[async_trait]
pub trait LogoSource: Send + Sync {
    /// Whether `logo` can answer for this token at all. Tokens it cannot
    /// are never looked up and never cached.
    fn accepts(&self, _chain_id: u64, address: &str) -> bool {
        is_evm_address(address)
    }

    async fn logo(&self, chain_id: u64, address: &str) -> VaultoResult<Option<String>>;
}

#[async_trait]
impl LogoSource for CoinGeckoClient {
    fn accepts(&self, chain_id: u64, address: &str) -> bool {
        matches!(contract_platform(chain_id, address), Ok(Some(_)))
    }

    async fn logo(&self, chain_id: u64, address: &str) -> VaultoResult<Option<String>> {
        self.logo_by_address(chain_id, address).await
    }
}

/// One line of the `cache-logos` input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoRequest {
    pub chain_id: u64,
    pub address: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmStats {
    pub resolved: usize,
    pub missing: usize,
    pub failed: usize,
}

pub struct LogoCache {
    entries: DashMap<String, Option<String>>,
    resolve_on_miss: bool,
}

impl LogoCache {
    pub fn new(resolve_on_miss: bool) -> Self {
        Self {
            entries: DashMap::new(),
            resolve_on_miss,
        }
    }

    /// Build from config, loading the seed file when one is set. A broken
    /// seed is logged and skipped.
    pub fn from_config(config: &LogoConfig) -> Self {
        let cache = Self::new(config.resolve_on_miss);
        if let Some(path) = &config.seed_file {
            match cache.load_seed(Path::new(path)) {
                Ok(n) => info!(entries = n, path = %path, "logo cache seeded"),
                Err(e) => warn!(path = %path, error = %e, "logo seed not loaded"),
            }
        }
        cache
    }

    /// Merge a `{key: url | null}` JSON file into the cache.
    pub fn load_seed(&self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let seed: HashMap<String, Option<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid logo seed {}", path.display()))?;
        let count = seed.len();
        for (key, url) in seed {
            self.entries.insert(key.trim().to_ascii_lowercase(), url);
        }
        Ok(count)
    }

    /// Write every entry, sorted by key, as a seed file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let sorted: BTreeMap<String, Option<String>> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&sorted).context("Failed to serialize logo cache")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// `Some(entry)` when cached, where the entry itself may be a miss.
    pub fn get(&self, chain_id: u64, address: &str) -> Option<Option<String>> {
        self.entries
            .get(&token_cache_key(chain_id, address))
            .map(|e| e.value().clone())
    }

    pub fn insert(&self, chain_id: u64, address: &str, logo_url: Option<String>) {
        self.entries.insert(token_cache_key(chain_id, address), logo_url);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached logo, asking `source` on a miss. Source errors are not
    /// cached, and neither is anything the source does not accept.
    pub async fn resolve(&self, source: &dyn LogoSource, chain_id: u64, address: &str) -> Option<String> {
        if let Some(cached) = self.get(chain_id, address) {
            return cached;
        }
        if !self.resolve_on_miss || !source.accepts(chain_id, address) {
            return None;
        }
        match source.logo(chain_id, address).await {
            Ok(url) => {
                debug!(chain_id, address, found = url.is_some(), "logo resolved");
                self.insert(chain_id, address, url.clone());
                url
            }
            Err(e) => {
                warn!(chain_id, address, error = %e, "logo lookup failed");
                None
            }
        }
    }

    /// Resolve a list one at a time, sleeping `delay` between upstream
    /// requests. Already-cached entries cost no request.
    pub async fn warm(&self, source: &dyn LogoSource, items: &[LogoRequest], delay: Duration) -> WarmStats {
        let mut stats = WarmStats::default();
        let mut first_request = true;

        for item in items {
            let cached = self.get(item.chain_id, &item.address);
            let outcome = match cached {
                Some(url) => Ok(url),
                None if !source.accepts(item.chain_id, &item.address) => {
                    warn!(chain_id = item.chain_id, address = %item.address, "unsupported token, skipped");
                    stats.failed += 1;
                    continue;
                }
                None => {
                    if !first_request && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    first_request = false;
                    source.logo(item.chain_id, &item.address).await
                }
            };

            match outcome {
                Ok(url) => {
                    if url.is_some() {
                        stats.resolved += 1;
                    } else {
                        stats.missing += 1;
                    }
                    self.insert(item.chain_id, &item.address, url);
                }
                Err(e) => {
                    warn!(chain_id = item.chain_id, address = %item.address, error = %e, "logo lookup failed");
                    stats.failed += 1;
                }
            }
        }
        info!(
            total = items.len(),
            resolved = stats.resolved,
            missing = stats.missing,
            failed = stats.failed,
            "logo cache warmed"
        );
        stats
    }
}

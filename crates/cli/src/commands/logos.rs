//! `vaulto cache-logos`: resolve a token list into a logo seed file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use vaulto_core::logo::{LogoCache, LogoRequest};
use vaulto_mod_coingecko::CoinGeckoClient;
use vaulto_types::output::LogoCacheReport;
use vaulto_utils::output::{render, OutputFormat};

use crate::factory;

pub async fn cache_logos(input: &Path, output: &Path, delay_ms: u64, fmt: OutputFormat) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let items: Vec<LogoRequest> = serde_json::from_str(&raw)
        .with_context(|| format!("{} must be a JSON array of {{chainId, address}}", input.display()))?;

    let config = factory::config()?;
    let coingecko = CoinGeckoClient::new(&config.coingecko);

    // Re-runs only ask for what the previous seed does not have.
    let cache = LogoCache::new(true);
    if output.is_file() {
        let n = cache.load_seed(output)?;
        info!(entries = n, "resuming from existing seed");
    }

    let stats = cache
        .warm(&coingecko, &items, Duration::from_millis(delay_ms))
        .await;
    cache.save(output)?;

    render(
        fmt,
        &LogoCacheReport {
            total: items.len(),
            resolved: stats.resolved,
            missing: stats.missing,
            failed: stats.failed,
            output: output.display().to_string(),
        },
    )
}

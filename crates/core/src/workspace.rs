use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use vaulto_types::config::AppConfig;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".vaulto";

/// Required subdirectories inside the dotfolder.
const SUBDIRS: &[&str] = &["data"];

const CONFIG_FILE: &str = "config.toml";

/// Logo seed picked up when `logos.seed_file` is unset.
pub const DEFAULT_LOGO_SEED: &str = "data/logos.json";

/// Resolve the root path: `$HOME/.vaulto/`.
pub fn root_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

/// Resolve a path relative to the dotfolder root.
pub fn resolve(relative: &str) -> Result<PathBuf> {
    Ok(root_dir()?.join(relative))
}

/// Ensure the dotfolder exists, seeding `config.toml` with defaults.
/// Idempotent.
///
/// ```text
/// $HOME/.vaulto/
/// ├── config.toml
/// └── data/
///     └── logos.json   (optional, written by `vaulto cache-logos`)
/// ```
pub fn init_workspace() -> Result<()> {
    init_workspace_at(&root_dir()?)
}

pub fn init_workspace_at(root: &Path) -> Result<()> {
    for sub in SUBDIRS {
        let dir = root.join(sub);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            info!("created directory: {}", dir.display());
        }
    }

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        let toml_str = AppConfig::default()
            .to_toml_string()
            .context("Failed to serialize default config")?;
        fs::write(&config_path, &toml_str)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info!("created default config: {}", config_path.display());
    }

    debug!("workspace ready at {}", root.display());
    Ok(())
}

/// Load the config from disk. An outdated file is regenerated with
/// defaults, keeping the secrets and the cache URL it held.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&root_dir()?)
}

pub fn load_config_from(root: &Path) -> Result<AppConfig> {
    let config_path = root.join(CONFIG_FILE);
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match AppConfig::from_toml_str(&raw) {
        Ok(config) => Ok(config),
        Err(e) => {
            info!(error = %e, "config.toml outdated, migrating to new schema");
            let config = migrate(&raw);
            save_config_to(root, &config)?;
            info!("config migrated successfully");
            Ok(config)
        }
    }
}

/// Defaults plus whatever secrets can still be read from an old file.
fn migrate(raw: &str) -> AppConfig {
    let mut config = AppConfig::default();
    let Ok(old) = raw.parse::<toml::Table>() else {
        return config;
    };
    let string_at = |section: &str, key: &str| {
        old.get(section)
            .and_then(|v| v.as_table())
            .and_then(|t| t.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    if let Some(key) = string_at("subgraph", "api_key") {
        config.subgraph.api_key = key;
    }
    if let Some(key) = string_at("coingecko", "api_key") {
        config.coingecko.api_key = key;
    }
    if let Some(tier) = string_at("coingecko", "tier").and_then(|t| t.parse().ok()) {
        config.coingecko.tier = tier;
    }
    if let Some(url) = string_at("cache", "redis_url") {
        config.cache.redis_url = Some(url);
    }
    config
}

/// Write the config back to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&root_dir()?, config)
}

pub fn save_config_to(root: &Path, config: &AppConfig) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(&config_path, &toml_str)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}

/// The effective config for a binary: `.env`, then the dotfolder file,
/// then environment overrides.
pub fn load_app_config() -> Result<AppConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("loaded {}", path.display());
    }
    let root = root_dir()?;
    init_workspace_at(&root)?;
    let mut config = load_config_from(&root)?;
    config.apply_env_vars();

    if config.logos.seed_file.is_none() {
        let seed = root.join(DEFAULT_LOGO_SEED);
        if seed.is_file() {
            config.logos.seed_file = Some(seed.display().to_string());
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaulto_types::config::CoinGeckoTier;

    fn scratch(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vaulto-ws-{}-{label}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_root_dir_under_home() {
        let root = root_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(root, home.join(".vaulto"));
    }

    #[test]
    fn test_resolve_nested() {
        let path = resolve(DEFAULT_LOGO_SEED).unwrap();
        assert_eq!(path, root_dir().unwrap().join("data/logos.json"));
    }

    #[test]
    fn test_init_idempotent_and_seeds_defaults() {
        let root = scratch("init");
        init_workspace_at(&root).unwrap();
        init_workspace_at(&root).unwrap();
        assert!(root.join("data").is_dir());
        assert!(root.join(CONFIG_FILE).is_file());

        let config = load_config_from(&root).unwrap();
        assert_eq!(config.server.port, AppConfig::default().server.port);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_save_and_reload() {
        let root = scratch("save");
        init_workspace_at(&root).unwrap();
        let mut config = load_config_from(&root).unwrap();
        config.pricing.assumed_eth_price_usd = 2500.0;
        config.subgraph.api_key = "graph-key".into();
        save_config_to(&root, &config).unwrap();

        let reloaded = load_config_from(&root).unwrap();
        assert_eq!(reloaded.pricing.assumed_eth_price_usd, 2500.0);
        assert_eq!(reloaded.subgraph.api_key, "graph-key");
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_outdated_config_migrates_secrets() {
        let root = scratch("migrate");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join(CONFIG_FILE),
            r#"
[server]
port = "not-a-number"

[subgraph]
api_key = "kept-graph"

[coingecko]
tier = "pro"
api_key = "kept-cg"
"#,
        )
        .unwrap();

        let config = load_config_from(&root).unwrap();
        assert_eq!(config.server.port, AppConfig::default().server.port);
        assert_eq!(config.subgraph.api_key, "kept-graph");
        assert_eq!(config.coingecko.api_key, "kept-cg");
        assert_eq!(config.coingecko.tier, CoinGeckoTier::Pro);

        // The migrated file parses cleanly now.
        let raw = fs::read_to_string(root.join(CONFIG_FILE)).unwrap();
        assert!(AppConfig::from_toml_str(&raw).is_ok());
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_unparseable_file_resets_to_defaults() {
        let root = scratch("garbage");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(CONFIG_FILE), "this is [not toml").unwrap();
        let config = load_config_from(&root).unwrap();
        assert!(config.subgraph.api_key.is_empty());
        fs::remove_dir_all(&root).ok();
    }
}

//! CLI output rendering: JSON or a human-readable table.
//!
//! Usage:
//! ```ignore
//! use vaulto_utils::output::{OutputFormat, render};
//!
//! let data = PoolsOutput { ... };
//! render(format, &data)?;
//! ```

use anyhow::Result;
use serde::Serialize;

use vaulto_common::types::{CoinPrice, Pool};
use vaulto_types::output::*;

use crate::format::{format_date, format_market_cap, format_price_or_na, format_usd};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Table,
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            other => Err(format!("unknown output format '{other}' (table, json, json-pretty)")),
        }
    }
}

/// Trait for types that can render as a human-readable table.
pub trait TableDisplay {
    fn print_table(&self);
}

/// Render structured output: JSON or table depending on format.
pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    match format {
        OutputFormat::Table => {
            data.print_table();
            Ok(())
        }
        _ => {
            println!("{}", to_json_string(format, data)?);
            Ok(())
        }
    }
}

/// Render just the JSON formats. Returns `false` when table mode was requested.
pub fn render_json_or<T: Serialize>(format: OutputFormat, data: &T) -> Result<bool> {
    match format {
        OutputFormat::Table => Ok(false),
        _ => {
            println!("{}", to_json_string(format, data)?);
            Ok(true)
        }
    }
}

fn to_json_string<T: Serialize>(format: OutputFormat, data: &T) -> Result<String> {
    Ok(match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(data)?,
        _ => serde_json::to_string(data)?,
    })
}

/// Truncate to `max` chars with an ellipsis, for fixed-width columns.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// `0xa0b8…eb48` for table columns.
fn short_address(address: &str) -> String {
    if address.is_ascii() && address.len() > 12 {
        format!("{}…{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

fn print_pool_rows(pools: &[Pool]) {
    println!("┌──────────────┬─────────────────┬────────┬──────────────┬──────────────┐");
    println!("│ Pool         │ Pair            │ Fee    │ TVL          │ Volume       │");
    println!("├──────────────┼─────────────────┼────────┼──────────────┼──────────────┤");
    for p in pools {
        let pair = format!("{}/{}", p.token0.symbol, p.token1.symbol);
        println!(
            "│ {:<12} │ {:<15} │ {:>6} │ {:>12} │ {:>12} │",
            short_address(&p.address),
            clip(&pair, 15),
            format!("{:.2}%", f64::from(p.fee_tier_bps) / 10_000.0),
            format_market_cap(p.tvl_usd),
            format_market_cap(p.volume_usd),
        );
    }
    println!("└──────────────┴─────────────────┴────────┴──────────────┴──────────────┘");
}

// ─── TableDisplay implementations for output types ──────────────────

impl TableDisplay for TokenSearchOutput {
    fn print_table(&self) {
        if self.tokens.is_empty() {
            println!("No tokens matching '{}' on chain {}.", self.query, self.chain_id);
            return;
        }

        println!("┌──────────────┬──────────┬──────────────────────┬──────────────┬──────────────┐");
        println!("│ Address      │ Symbol   │ Name                 │ TVL          │ 24h Volume   │");
        println!("├──────────────┼──────────┼──────────────────────┼──────────────┼──────────────┤");
        for t in &self.tokens {
            println!(
                "│ {:<12} │ {:<8} │ {:<20} │ {:>12} │ {:>12} │",
                short_address(&t.address),
                clip(&t.symbol, 8),
                clip(&t.name, 20),
                format_market_cap(t.tvl_usd),
                format_market_cap(t.volume_usd),
            );
        }
        println!("└──────────────┴──────────┴──────────────────────┴──────────────┴──────────────┘");
    }
}

impl TableDisplay for LiquidityResponse {
    fn print_table(&self) {
        if let Some(err) = &self.error {
            println!("✗ {err}");
            return;
        }
        if self.tokens.is_empty() {
            println!("No tokens found on chain {}.", self.chain_id);
            return;
        }
        for t in &self.tokens {
            println!(
                "{} ({})  {}  TVL {}  24h {}",
                t.symbol,
                t.name,
                t.address,
                format_market_cap(t.tvl_usd),
                format_market_cap(t.volume_usd),
            );
            if t.pools.is_empty() {
                println!("  no pools");
            } else {
                print_pool_rows(&t.pools);
            }
        }
    }
}

impl TableDisplay for PoolsOutput {
    fn print_table(&self) {
        if self.pools.is_empty() {
            println!("No pools for {} on chain {}.", self.address, self.chain_id);
            return;
        }
        print_pool_rows(&self.pools);
    }
}

impl TableDisplay for TokenDetailsApiResponse {
    fn print_table(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  {:<56}║", clip(&format!("{} · {}", self.token.symbol, self.token.name), 56));
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║  Address    : {:<43}║", short_address(&self.token.address));
        println!("║  Chain      : {:<43}║", self.chain_id);
        println!("║  Price      : {:<43}║", self.price_formatted);
        println!("║  TVL        : {:<43}║", format_market_cap(self.tvl_usd));
        println!("║  Volume     : {:<43}║", format_market_cap(self.volume_usd));
        println!("║  24h Volume : {:<43}║", format_market_cap(self.volume_24h_usd));
        println!("║  Pools      : {:<43}║", self.pools.len());
        println!("╠══════════════════════════════════════════════════════════╣");
        match (self.price_history.first(), self.price_history.last()) {
            (Some(first), Some(last)) => {
                let range = format!(
                    "{} → {} ({} days)",
                    format_date(first.timestamp),
                    format_date(last.timestamp),
                    self.price_history.len()
                );
                println!("║  History    : {:<43}║", range);
            }
            _ => println!("║  History    : {:<43}║", "none"),
        }
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

impl TableDisplay for CoinPrice {
    fn print_table(&self) {
        let dash = "—".to_string();
        println!("{} ({})", self.symbol.to_uppercase(), self.id);
        println!("  Price      : {}", format_price_or_na(self.price_usd));
        println!(
            "  Market Cap : {}",
            self.market_cap_usd.map(format_market_cap).unwrap_or_else(|| dash.clone())
        );
        println!(
            "  24h Volume : {}",
            self.volume_24h_usd.map(format_market_cap).unwrap_or_else(|| dash.clone())
        );
        println!(
            "  24h Change : {}",
            self.change_24h_pct.map(|c| format!("{c:+.2}%")).unwrap_or(dash)
        );
    }
}

impl TableDisplay for MarketCapOutput {
    fn print_table(&self) {
        match &self.market_cap_formatted {
            Some(mc) => println!("{}  {}", self.address, mc),
            None => println!("{}  market cap unavailable", self.address),
        }
    }
}

impl TableDisplay for Vec<SolanaTokenData> {
    fn print_table(&self) {
        println!("┌──────────────┬──────────────┬──────────────┬──────────────┐");
        println!("│ Mint         │ Liquidity    │ 24h Volume   │ Market Cap   │");
        println!("├──────────────┼──────────────┼──────────────┼──────────────┤");
        for t in self {
            println!(
                "│ {:<12} │ {:>12} │ {:>12} │ {:>12} │",
                short_address(&t.address),
                t.tvl_usd.map(format_market_cap).unwrap_or_else(|| "—".into()),
                format_market_cap(t.volume_usd),
                t.market_cap_formatted.as_deref().unwrap_or("—"),
            );
        }
        println!("└──────────────┴──────────────┴──────────────┴──────────────┘");
    }
}

impl TableDisplay for StockDataResponse {
    fn print_table(&self) {
        let q = &self.quote;
        let change = match (q.change, q.change_percent) {
            (Some(c), Some(p)) => format!("{c:+.2} ({p:+.2}%)"),
            _ => "—".into(),
        };
        println!("{}  {}  {}", self.ticker, format_usd(q.price), change);
        if self.history.is_empty() {
            return;
        }
        println!("┌────────────┬────────────┬────────────┬────────────┬────────────┐");
        println!("│ Date       │ Open       │ High       │ Low        │ Close      │");
        println!("├────────────┼────────────┼────────────┼────────────┼────────────┤");
        for c in &self.history {
            println!(
                "│ {:<10} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>10.2} │",
                format_date(c.timestamp),
                c.open,
                c.high,
                c.low,
                c.close,
            );
        }
        println!("└────────────┴────────────┴────────────┴────────────┴────────────┘");
    }
}

impl TableDisplay for LogoCacheReport {
    fn print_table(&self) {
        println!(
            "✓ Cached {}/{} logos ({} without logo, {} failed) → {}",
            self.resolved, self.total, self.missing, self.failed, self.output
        );
    }
}

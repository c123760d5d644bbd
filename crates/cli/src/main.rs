mod commands;
mod factory;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use vaulto_common::constants::CHAIN_ETHEREUM;
use vaulto_common::error::VaultoError;
use vaulto_utils::output::OutputFormat;

use commands::prices::PriceQuery;

#[derive(Parser)]
#[command(
    name = "vaulto",
    about = "Vaulto Swap market data.\nUniswap v3 liquidity, token details, prices, Solana market caps and stock quotes.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat { Table, Json, JsonPretty }

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    // ── UNISWAP V3 ──────────────────────────────────────────────

    /// Search tokens by symbol or name, by TVL.
    Search {
        query: String,
        #[arg(long, default_value_t = CHAIN_ETHEREUM)]
        chain: u64,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Pools trading a token, by TVL.
    Pools {
        address: String,
        #[arg(long, default_value_t = CHAIN_ETHEREUM)]
        chain: u64,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Token details: identity, price, TVL, volume, history, pools.
    Token {
        address: String,
        #[arg(long, default_value_t = CHAIN_ETHEREUM)]
        chain: u64,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    // ── PRICES ──────────────────────────────────────────────────

    /// CoinGecko USD price by symbol, or by contract with --chain/--address.
    Price {
        #[arg(required_unless_present = "address", conflicts_with = "address")]
        symbol: Option<String>,
        #[arg(long, requires = "address")]
        chain: Option<u64>,
        #[arg(long, requires = "chain")]
        address: Option<String>,
    },

    // ── SOLANA ──────────────────────────────────────────────────

    /// Market cap scraped from the Jupiter token page.
    #[command(name = "market-cap")]
    MarketCap { mint: String },

    /// Liquidity, 24h volume and market cap for one or more mints.
    Solana {
        #[arg(required = true)]
        mints: Vec<String>,
    },

    // ── STOCKS ──────────────────────────────────────────────────

    /// Quote and 30 daily candles for a ticker, xStock symbol or mapped address.
    Stock { input: String },

    // ── UTILITIES ───────────────────────────────────────────────

    /// Resolve logos for a token list and write a seed file.
    #[command(name = "cache-logos")]
    CacheLogos {
        /// JSON array of {chainId, address}.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Pause between CoinGecko requests.
        #[arg(long, default_value_t = 1500)]
        delay_ms: u64,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let fmt: OutputFormat = cli.output.into();

    match cli.command {
        Commands::Search { query, chain, limit } => commands::uniswap::search(&query, chain, limit, fmt).await,
        Commands::Pools { address, chain, limit } => commands::uniswap::pools(&address, chain, limit, fmt).await,
        Commands::Token { address, chain, days } => commands::uniswap::token(&address, chain, days, fmt).await,

        Commands::Price { symbol, chain, address } => {
            let query = match (symbol, chain, address) {
                (_, Some(chain_id), Some(address)) => PriceQuery::Contract { chain_id, address },
                (Some(symbol), _, _) => PriceQuery::Symbol(symbol),
                _ => anyhow::bail!("Give a symbol, or --chain and --address"),
            };
            commands::prices::price(query, fmt).await
        }

        Commands::MarketCap { mint } => commands::solana::market_cap(&mint, fmt).await,
        Commands::Solana { mints } => commands::solana::token_data(&mints, fmt).await,
        Commands::Stock { input } => commands::stock::stock(&input, fmt).await,

        Commands::CacheLogos { input, output, delay_ms } => {
            commands::logos::cache_logos(&input, &output, delay_ms, fmt).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = !matches!(cli.output, CliOutputFormat::Table);

    if let Err(err) = run(cli).await {
        let code = match err.downcast_ref::<VaultoError>() {
            Some(e) if json => {
                println!("{}", e.to_json());
                e.exit_code()
            }
            Some(e) => {
                let detail = e.detail();
                eprintln!("error: {}", detail.message);
                for hint in &detail.hints {
                    eprintln!("  hint: {hint}");
                }
                e.exit_code()
            }
            None => {
                eprintln!("error: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["vaulto", "search", "USDC"]).unwrap();
        match cli.command {
            Commands::Search { query, chain, limit } => {
                assert_eq!(query, "USDC");
                assert_eq!(chain, 1);
                assert_eq!(limit, 10);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["vaulto", "stock", "TSLAx", "-o", "json-pretty"]).unwrap();
        assert!(matches!(OutputFormat::from(cli.output), OutputFormat::JsonPretty));
    }

    #[test]
    fn test_price_by_contract() {
        let cli = Cli::try_parse_from([
            "vaulto", "price", "--chain", "8453", "--address", "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Price { symbol: None, chain: Some(8453), address: Some(_) }
        ));
        assert!(Cli::try_parse_from(["vaulto", "price"]).is_err());
        assert!(Cli::try_parse_from(["vaulto", "price", "--address", "0xabc"]).is_err());
    }

    #[test]
    fn test_cache_logos_args() {
        let cli = Cli::try_parse_from([
            "vaulto", "cache-logos", "--input", "tokens.json", "--output", "logos.json",
        ])
        .unwrap();
        match cli.command {
            Commands::CacheLogos { input, output, delay_ms } => {
                assert_eq!(input, PathBuf::from("tokens.json"));
                assert_eq!(output, PathBuf::from("logos.json"));
                assert_eq!(delay_ms, 1500);
            }
            _ => panic!("expected cache-logos"),
        }
    }

    #[test]
    fn test_solana_requires_mint() {
        assert!(Cli::try_parse_from(["vaulto", "solana"]).is_err());
        let cli = Cli::try_parse_from(["vaulto", "solana", "mintA", "mintB"]).unwrap();
        assert!(matches!(cli.command, Commands::Solana { mints } if mints.len() == 2));
    }
}

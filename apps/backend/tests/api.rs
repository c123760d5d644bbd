//! Router tests over an in-memory subgraph and Solana source.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use vaulto_backend::{app, AppState};
use vaulto_common::constants::MAX_SOLANA_BATCH;
use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::traits::SolanaMarketSource;
use vaulto_common::types::SolanaTokenStats;
use vaulto_core::MarketData;
use vaulto_mod_uniswap::mock::{day_row, pool_row, token_row, MockSubgraph};
use vaulto_mod_uniswap::UniswapModule;
use vaulto_types::config::AppConfig;

const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const USDC_CHECKSUM: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
const UNKNOWN: &str = "0x000000000000000000000000000000000000dead";

struct FakeJupiter;

#[async_trait]
impl SolanaMarketSource for FakeJupiter {
    async fn token_stats(&self, mint: &str) -> VaultoResult<SolanaTokenStats> {
        if mint.starts_with("Bad") {
            return Err(VaultoError::Network("jupiter unreachable".into()));
        }
        Ok(SolanaTokenStats {
            tvl_usd: Some(250_000.0),
            volume_usd: 1_234.5,
        })
    }

    async fn market_cap(&self, _mint: &str) -> Option<String> {
        Some("$1.35T".into())
    }
}

fn subgraph() -> MockSubgraph {
    MockSubgraph::new(|op, vars| match op {
        "SearchTokens" => Ok(json!({
            "bySymbol": [token_row(USDC_CHECKSUM, "USDC", "USD Coin", "52000000", Some("1800000"))],
            "byName": []
        })),
        "PoolsForToken" if vars["token"] == USDC => Ok(json!({
            "asToken0": [pool_row("0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640", "500", "150000000", (USDC, "USDC"), (WETH, "WETH"))],
            "asToken1": []
        })),
        "PoolsForToken" => Ok(json!({ "asToken0": [], "asToken1": [] })),
        "TokenFull" if vars["id"] == USDC => Ok(json!({
            "token": {
                "id": USDC,
                "symbol": "USDC",
                "name": "USD Coin",
                "decimals": "6",
                "totalValueLockedUSD": "52000000",
                "volumeUSD": "900000000",
                "derivedETH": "0.0003",
                "tokenDayData": []
            }
        })),
        "TokenFull" | "TokenById" => Ok(json!({ "token": null })),
        "TokenDayData" if vars["token"] == USDC => Ok(json!({
            "tokenDayDatas": [day_row(1_700_000_000, "1.0", "1500000"), day_row(1_700_086_400, "1.0", "1800000")]
        })),
        "TokenDayData" => Ok(json!({ "tokenDayDatas": [] })),
        other => Err(VaultoError::Internal(format!("unexpected operation {other}"))),
    })
}

fn test_app() -> Router {
    let mut config = AppConfig::default();
    config.geo.base_url = "http://127.0.0.1:9".into();
    config.logos.resolve_on_miss = false;

    let market = MarketData::new(
        &config,
        UniswapModule::new(Arc::new(subgraph())),
        Arc::new(FakeJupiter),
    );
    let state = AppState::new(&config, market);
    state.logos.insert(1, USDC, Some("https://img.example/usdc.png".into()));
    app(Arc::new(state))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health() {
    let (status, body) = send(test_app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vaulto-backend");
}

#[tokio::test]
async fn liquidity_end_to_end() {
    let (status, body) = send(
        test_app(),
        post_json("/api/uniswap/liquidity", r#"{"chainId":1,"query":"USDC"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chainId"], 1);
    assert!(body.get("error").is_none());

    let tokens = body["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["address"], USDC);
    assert_eq!(tokens[0]["volumeUSD"], 1_800_000.0);

    let pools = tokens[0]["pools"].as_array().unwrap();
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0]["feeTierBps"], 500);
}

#[tokio::test]
async fn liquidity_rejects_bad_requests() {
    for body in [r#"{"query":"USDC"}"#, r#"{"chainId":"one","query":"USDC"}"#, "not json"] {
        let (status, _) = send(test_app(), post_json("/api/uniswap/liquidity", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }

    let (status, body) = send(
        test_app(),
        post_json("/api/uniswap/liquidity", r#"{"chainId":56,"query":"USDC"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_CHAIN");
}

#[tokio::test]
async fn token_details_prices_via_derived_eth() {
    let uri = format!("/api/uniswap/token-details?chainId=1&address={USDC_CHECKSUM}&days=7");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"]["address"], USDC);
    assert_eq!(body["tvlUSD"], 52_000_000.0);
    assert_eq!(body["volume24hUSD"], 1_800_000.0);
    assert_eq!(body["priceHistory"].as_array().unwrap().len(), 2);
    assert_eq!(body["pools"].as_array().unwrap().len(), 1);
    let price = body["priceUSD"].as_f64().unwrap();
    assert!((price - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn token_details_errors() {
    let (status, _) = send(test_app(), get("/api/uniswap/token-details?chainId=1&address=0x123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(test_app(), get("/api/uniswap/token-details?address=0x123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/uniswap/token-details?chainId=1&address={UNKNOWN}");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn solana_batch_isolates_failures() {
    let (status, body) = send(
        test_app(),
        post_json(
            "/api/solana/token-data",
            r#"{"addresses":["XsDoVfqeBukxuZHWhdvWHBhgEHjGNst4MLodqsJHzoB","BadMint","So11111111111111111111111111111111111111112"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["marketCapFormatted"], "$1.35T");
    assert_eq!(entries[0]["tvlUSD"], 250_000.0);
    assert_eq!(entries[1], json!({ "address": "BadMint", "volumeUSD": 0.0 }));
    assert_eq!(entries[2]["address"], "So11111111111111111111111111111111111111112");
}

#[tokio::test]
async fn solana_batch_validates_body() {
    for body in [r#"{}"#, r#"{"addresses":"mint"}"#, r#"{"addresses":[1,2]}"#] {
        let (status, _) = send(test_app(), post_json("/api/solana/token-data", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn solana_batch_is_capped() {
    let mints = |n: usize| json!({ "addresses": (0..n).map(|i| format!("Mint{i}")).collect::<Vec<_>>() });

    let full = mints(MAX_SOLANA_BATCH).to_string();
    let (status, body) = send(test_app(), post_json("/api/solana/token-data", &full)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), MAX_SOLANA_BATCH);

    let over = mints(MAX_SOLANA_BATCH + 1).to_string();
    let (status, body) = send(test_app(), post_json("/api/solana/token-data", &over)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn location_uses_edge_header() {
    let req = Request::get("/api/check-location")
        .header("cf-ipcountry", "US")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isRestricted": true, "countryCode": "US" }));
}

#[tokio::test]
async fn location_fails_open() {
    let req = Request::get("/api/check-location")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRestricted"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn token_logo_from_cache() {
    let uri = format!("/api/token-logo?chainId=1&address={USDC_CHECKSUM}");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logoUrl"], "https://img.example/usdc.png");
    assert_eq!(body["address"], USDC);

    let uri = format!("/api/token-logo?chainId=1&address={WETH}");
    let (_, body) = send(test_app(), get(&uri)).await;
    assert!(body["logoUrl"].is_null());
}

#[tokio::test]
async fn token_logo_rejects_unresolvable_input() {
    let uri = "/api/token-logo?chainId=1&address=..%2F..%2Fsimple%2Fprice";
    let (status, body) = send(test_app(), get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ADDRESS");

    let uri = format!("/api/token-logo?chainId=999999&address={WETH}");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_CHAIN");
}

#[tokio::test]
async fn price_by_address_rejects_traversal() {
    let uri = "/api/coingecko/price?chainId=1&address=..%2F..%2F..%2Fsimple%2Fprice%3Fids%3Dbitcoin";
    let (status, body) = send(test_app(), get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ADDRESS");
}

#[tokio::test]
async fn token_details_clamps_days() {
    let uri = format!("/api/uniswap/token-details?chainId=1&address={USDC}&days=4000000000");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priceHistory"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn price_requires_a_selector() {
    let (status, body) = send(test_app(), get("/api/coingecko/price")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn stock_data_unmapped_address_is_404() {
    let uri = format!("/api/token/{WETH}/stock-data");
    let (status, body) = send(test_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TICKER_NOT_FOUND");
}

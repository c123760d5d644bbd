//! `YahooClient` against a local stub chart API.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use vaulto_common::error::VaultoError;
use vaulto_mod_yahoo::YahooClient;

async fn chart(Path(ticker): Path<String>, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(q.get("range").map(String::as_str), Some("1mo"));
    assert_eq!(q.get("interval").map(String::as_str), Some("1d"));
    match ticker.as_str() {
        "TSLA" => Json(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "TSLA", "currency": "USD", "regularMarketPrice": 250.0, "chartPreviousClose": 245.0 },
                    "timestamp": [1700000000, 1700086400],
                    "indicators": { "quote": [{
                        "open": [240.0, 245.0], "high": [246.0, 251.0],
                        "low": [239.0, 244.0], "close": [245.0, 250.0],
                        "volume": [1000, 2000]
                    }]}
                }],
                "error": null
            }
        }))
        .into_response(),
        "SLOW" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found" } } })),
        )
            .into_response(),
    }
}

async fn client() -> YahooClient {
    let app = Router::new().route("/v8/finance/chart/:ticker", get(chart));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    YahooClient::new(&format!("http://{addr}"))
}

#[tokio::test]
async fn chart_returns_quote_and_history() {
    let yahoo = client().await;
    let data = yahoo.chart("tsla").await.unwrap();
    assert_eq!(data.quote.symbol, "TSLA");
    assert_eq!(data.quote.change, Some(5.0));
    assert_eq!(data.history.len(), 2);
    assert_eq!(data.history[1].close, 250.0);
}

#[tokio::test]
async fn unknown_ticker_is_not_found() {
    let yahoo = client().await;
    assert!(matches!(yahoo.chart("ZZZZ").await, Err(VaultoError::TickerNotFound(_))));
}

#[tokio::test]
async fn upstream_failure_is_protocol_error() {
    let yahoo = client().await;
    assert!(matches!(yahoo.chart("SLOW").await, Err(VaultoError::Protocol { .. })));
}

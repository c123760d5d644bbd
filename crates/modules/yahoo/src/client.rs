use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use vaulto_common::error::{VaultoError, VaultoResult};

use crate::chart::{parse_chart, StockData};

const PROTOCOL: &str = "yahoo";

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; vaulto/0.1)";

pub struct YahooClient {
    http: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build Yahoo HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Quote plus the last month of daily candles.
    pub async fn chart(&self, ticker: &str) -> VaultoResult<StockData> {
        let ticker = ticker.trim().to_ascii_uppercase();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .http
            .get(&url)
            .query(&[("range", "1mo"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VaultoError::ProtocolTimeout(format!("Yahoo chart for {ticker} timed out"))
                } else {
                    VaultoError::Network(format!("Yahoo request failed: {e}"))
                }
            })?;

        let status = resp.status();
        match status {
            StatusCode::NOT_FOUND => return Err(VaultoError::TickerNotFound(ticker)),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(VaultoError::RateLimited(format!("Yahoo 429 for {ticker}")))
            }
            s if !s.is_success() => {
                return Err(VaultoError::protocol(PROTOCOL, format!("HTTP {s} for {ticker}")))
            }
            _ => {}
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| VaultoError::Parse(format!("Yahoo chart for {ticker}: {e}")))?;
        let data = parse_chart(&ticker, &json)?;
        debug!(ticker = %ticker, price = data.quote.price, candles = data.history.len(), "Yahoo chart");
        Ok(data)
    }
}

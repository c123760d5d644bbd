use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::extract::{default_extractors, MarketCapExtractor};

/// Browser UA; the token pages serve a stripped shell to unknown agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Scrapes market caps from `{page_base}/{mint}`.
pub struct JupiterScraper {
    http: Client,
    page_base: String,
    extractors: Vec<Box<dyn MarketCapExtractor>>,
}

impl JupiterScraper {
    pub fn new(page_base: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build Jupiter HTTP client");

        Self {
            http,
            page_base: page_base.trim_end_matches('/').to_string(),
            extractors: default_extractors(),
        }
    }

    /// Replace the extraction strategies (tried in order).
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn MarketCapExtractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    /// Run the extractors over a page, first hit wins.
    pub fn extract(&self, html: &str) -> Option<String> {
        self.extractors.iter().find_map(|x| {
            let found = x.extract(html);
            if let Some(mc) = &found {
                debug!(strategy = x.name(), market_cap = %mc, "market cap extracted");
            }
            found
        })
    }

    /// Formatted market cap for a mint. `None` on any failure; never errors.
    pub async fn market_cap(&self, mint: &str) -> Option<String> {
        let mint = mint.trim();
        if mint.is_empty() {
            return None;
        }
        let url = format!("{}/{}", self.page_base, mint);

        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(mint, error = %e, "Jupiter page fetch failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            debug!(mint, status = %resp.status(), "Jupiter page not available");
            return None;
        }
        let html = match resp.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!(mint, error = %e, "Jupiter page read failed");
                return None;
            }
        };

        let found = self.extract(&html);
        if found.is_none() {
            debug!(mint, "no market cap on Jupiter page");
        }
        found
    }
}

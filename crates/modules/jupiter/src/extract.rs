//! Market-cap extraction strategies for Jupiter token pages.
//!
//! Each strategy reads the raw HTML and returns a formatted market cap
//! (`"$1.2B"`) or `None`. The scraper tries them in order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use vaulto_utils::format::format_market_cap;

/// Pulls a formatted market cap out of a token page.
pub trait MarketCapExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, html: &str) -> Option<String>;
}

static NEXT_DATA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]*\bid\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("Invalid __NEXT_DATA__ regex")
});

static BUTTON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<button\b[^>]*>(.*?)</button>").expect("Invalid button regex"));

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid tag regex"));

const STOCK_MC_LABEL: &str = "Stock MC";

// ── __NEXT_DATA__ ───────────────────────────────────────────────────

/// Reads the Next.js page state embedded in `<script id="__NEXT_DATA__">`.
///
/// Looks at `props.pageProps`, then every
/// `pageProps.dehydratedState.queries[*].state.data`, for `mcap`,
/// `marketCap` or `stockData.mcap`. Numbers and numeric strings both count.
pub struct NextDataExtractor;

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn mcap_in(obj: &Value) -> Option<f64> {
    [obj.get("mcap"), obj.get("marketCap"), obj.pointer("/stockData/mcap")]
        .into_iter()
        .flatten()
        .filter_map(numeric)
        .find(|v| v.is_finite() && *v > 0.0)
}

impl MarketCapExtractor for NextDataExtractor {
    fn name(&self) -> &'static str {
        "next-data"
    }

    fn extract(&self, html: &str) -> Option<String> {
        let raw = NEXT_DATA_PATTERN.captures(html)?.get(1)?.as_str();
        let data: Value = serde_json::from_str(raw.trim()).ok()?;
        let page_props = data.pointer("/props/pageProps")?;

        let queries = page_props
            .pointer("/dehydratedState/queries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        std::iter::once(page_props)
            .chain(queries.iter().filter_map(|q| q.pointer("/state/data")))
            .find_map(mcap_in)
            .map(format_market_cap)
    }
}

// ── "Stock MC" button ───────────────────────────────────────────────

/// Reads the rendered stats button: `<button>…Stock MC…<span>$1.2B</span></button>`.
pub struct StockMcButtonExtractor;

/// Visible text runs of an HTML fragment, in document order.
fn text_runs(fragment: &str) -> Vec<String> {
    TAG_PATTERN
        .split(fragment)
        .map(|s| s.replace("&nbsp;", " ").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl MarketCapExtractor for StockMcButtonExtractor {
    fn name(&self) -> &'static str {
        "stock-mc-button"
    }

    fn extract(&self, html: &str) -> Option<String> {
        BUTTON_PATTERN
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|inner| text_runs(inner.as_str()))
            .find_map(|runs| {
                let label = runs.iter().position(|r| r.contains(STOCK_MC_LABEL))?;
                let inline = runs[label]
                    .split_once(STOCK_MC_LABEL)
                    .map(|(_, rest)| rest.trim().to_string())
                    .filter(|rest| !rest.is_empty());
                inline
                    .into_iter()
                    .chain(runs[label + 1..].iter().cloned())
                    .find(|r| r.starts_with('$'))
                    .filter(|value| value != "$0")
            })
    }
}

/// Extractors in the order the scraper tries them.
pub fn default_extractors() -> Vec<Box<dyn MarketCapExtractor>> {
    vec![Box::new(NextDataExtractor), Box::new(StockMcButtonExtractor)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_data_page(json: &str) -> String {
        format!(
            r#"<html><head></head><body><div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">{json}</script></body></html>"#
        )
    }

    #[test]
    fn test_next_data_page_props_mcap() {
        let html = next_data_page(r#"{"props":{"pageProps":{"mcap":1234567.0}}}"#);
        assert_eq!(NextDataExtractor.extract(&html).as_deref(), Some("$1.23M"));
    }

    #[test]
    fn test_next_data_dehydrated_queries() {
        let html = next_data_page(
            r#"{"props":{"pageProps":{"dehydratedState":{"queries":[
                {"state":{"data":{"symbol":"TSLAx"}}},
                {"state":{"data":{"stockData":{"mcap":"1200000000"}}}}
            ]}}}}"#,
        );
        assert_eq!(NextDataExtractor.extract(&html).as_deref(), Some("$1.2B"));
    }

    #[test]
    fn test_next_data_market_cap_key() {
        let html = next_data_page(
            r#"{"props":{"pageProps":{"dehydratedState":{"queries":[
                {"state":{"data":{"marketCap":950000}}}
            ]}}}}"#,
        );
        assert_eq!(NextDataExtractor.extract(&html).as_deref(), Some("$950K"));
    }

    #[test]
    fn test_next_data_ignores_zero_and_garbage() {
        let zero = next_data_page(r#"{"props":{"pageProps":{"mcap":0}}}"#);
        assert_eq!(NextDataExtractor.extract(&zero), None);
        let broken = next_data_page("{not json");
        assert_eq!(NextDataExtractor.extract(&broken), None);
        assert_eq!(NextDataExtractor.extract("<html></html>"), None);
    }

    #[test]
    fn test_stock_mc_button() {
        let html = r#"<div>
            <button class="tab"><span>Overview</span></button>
            <button class="stat"><div><span>Stock MC</span><svg><path d="M0"/></svg></div><span>$1.05T</span></button>
        </div>"#;
        assert_eq!(StockMcButtonExtractor.extract(html).as_deref(), Some("$1.05T"));
    }

    #[test]
    fn test_stock_mc_button_inline_value() {
        let html = "<button>Stock MC&nbsp;$820.5B</button>";
        assert_eq!(StockMcButtonExtractor.extract(html).as_deref(), Some("$820.5B"));
    }

    #[test]
    fn test_stock_mc_button_rejects_zero() {
        let html = "<button><span>Stock MC</span><span>$0</span></button>";
        assert_eq!(StockMcButtonExtractor.extract(html), None);
    }

    #[test]
    fn test_stock_mc_button_skips_zero_for_later_button() {
        let html = r#"<button><span>Stock MC</span><span>$0</span></button>
            <button><span>Stock MC</span><span>$3.1B</span></button>"#;
        assert_eq!(StockMcButtonExtractor.extract(html).as_deref(), Some("$3.1B"));
    }

    #[test]
    fn test_stock_mc_button_missing() {
        let html = "<button><span>Market Cap</span><span>$5M</span></button>";
        assert_eq!(StockMcButtonExtractor.extract(html), None);
    }
}

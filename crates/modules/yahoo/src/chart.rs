//! Parsing of the `/v8/finance/chart` response.

use serde::Serialize;
use serde_json::Value;

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{Candle, StockQuote};

/// Daily candles kept, most recent last.
pub const MAX_CANDLES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockData {
    pub quote: StockQuote,
    pub history: Vec<Candle>,
}

fn f64_at(series: Option<&Value>, i: usize) -> Option<f64> {
    series?.get(i)?.as_f64().filter(|v| v.is_finite())
}

/// Turn a chart response into a quote plus up to [`MAX_CANDLES`] candles.
///
/// Rows with any null OHLC field are skipped; a null volume counts as 0.
pub fn parse_chart(ticker: &str, json: &Value) -> VaultoResult<StockData> {
    if let Some(err) = json.pointer("/chart/error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_str).unwrap_or_default();
        let description = err.get("description").and_then(Value::as_str).unwrap_or_default();
        return Err(if code.eq_ignore_ascii_case("Not Found") {
            VaultoError::TickerNotFound(ticker.to_string())
        } else {
            VaultoError::protocol("yahoo", format!("{code}: {description}"))
        });
    }

    let result = json
        .pointer("/chart/result/0")
        .ok_or_else(|| VaultoError::TickerNotFound(ticker.to_string()))?;
    let meta = result.get("meta").cloned().unwrap_or_default();

    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let quote = result.pointer("/indicators/quote/0");
    let series = |name: &str| quote.and_then(|q| q.get(name));
    let (open, high, low, close, volume) = (
        series("open"),
        series("high"),
        series("low"),
        series("close"),
        series("volume"),
    );

    let mut history: Vec<Candle> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(Candle {
                timestamp: ts.as_i64()?,
                open: f64_at(open, i)?,
                high: f64_at(high, i)?,
                low: f64_at(low, i)?,
                close: f64_at(close, i)?,
                volume: f64_at(volume, i).unwrap_or(0.0),
            })
        })
        .collect();
    if history.len() > MAX_CANDLES {
        history.drain(..history.len() - MAX_CANDLES);
    }

    let price = meta
        .get("regularMarketPrice")
        .and_then(Value::as_f64)
        .or_else(|| history.last().map(|c| c.close))
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| VaultoError::TickerNotFound(ticker.to_string()))?;

    let previous_close = meta
        .get("chartPreviousClose")
        .or_else(|| meta.get("previousClose"))
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite() && *p > 0.0);
    let change = previous_close.map(|prev| price - prev);
    let change_percent = previous_close.zip(change).map(|(prev, c)| c / prev * 100.0);

    Ok(StockData {
        quote: StockQuote {
            symbol: meta
                .get("symbol")
                .and_then(Value::as_str)
                .unwrap_or(ticker)
                .to_string(),
            price,
            previous_close,
            change,
            change_percent,
            currency: meta.get("currency").and_then(Value::as_str).map(str::to_string),
        },
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(len: usize) -> Value {
        let ts: Vec<i64> = (0..len as i64).map(|i| 1_700_000_000 + i * 86_400).collect();
        let px: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
        json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "TSLA",
                        "currency": "USD",
                        "regularMarketPrice": 250.0,
                        "chartPreviousClose": 200.0
                    },
                    "timestamp": ts,
                    "indicators": { "quote": [{
                        "open": px, "high": px, "low": px, "close": px, "volume": px
                    }]}
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_quote_fields() {
        let data = parse_chart("TSLA", &chart(3)).unwrap();
        assert_eq!(data.quote.symbol, "TSLA");
        assert_eq!(data.quote.price, 250.0);
        assert_eq!(data.quote.previous_close, Some(200.0));
        assert_eq!(data.quote.change, Some(50.0));
        assert_eq!(data.quote.change_percent, Some(25.0));
        assert_eq!(data.quote.currency.as_deref(), Some("USD"));
        assert_eq!(data.history.len(), 3);
    }

    #[test]
    fn test_history_capped_to_most_recent() {
        let data = parse_chart("TSLA", &chart(40)).unwrap();
        assert_eq!(data.history.len(), MAX_CANDLES);
        assert_eq!(data.history[0].close, 110.0);
        assert_eq!(data.history.last().unwrap().close, 139.0);
    }

    #[test]
    fn test_null_rows_skipped() {
        let json = json!({
            "chart": { "result": [{
                "meta": { "symbol": "AAPL", "regularMarketPrice": 190.0 },
                "timestamp": [1, 2, 3],
                "indicators": { "quote": [{
                    "open":  [1.0, null, 3.0],
                    "high":  [1.0, 2.0, 3.0],
                    "low":   [1.0, 2.0, 3.0],
                    "close": [1.0, 2.0, 3.0],
                    "volume": [10, 20, null]
                }]}
            }], "error": null }
        });
        let data = parse_chart("AAPL", &json).unwrap();
        let ts: Vec<i64> = data.history.iter().map(|c| c.timestamp).collect();
        assert_eq!(ts, [1, 3]);
        assert_eq!(data.history[1].volume, 0.0);
        assert_eq!(data.quote.previous_close, None);
        assert_eq!(data.quote.change, None);
    }

    #[test]
    fn test_not_found_error() {
        let json = json!({
            "chart": { "result": null, "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }}
        });
        assert!(matches!(parse_chart("ZZZZ", &json), Err(VaultoError::TickerNotFound(_))));
    }

    #[test]
    fn test_price_falls_back_to_last_close() {
        let mut json = chart(2);
        json["chart"]["result"][0]["meta"]
            .as_object_mut()
            .unwrap()
            .remove("regularMarketPrice");
        let data = parse_chart("TSLA", &json).unwrap();
        assert_eq!(data.quote.price, 101.0);
    }
}

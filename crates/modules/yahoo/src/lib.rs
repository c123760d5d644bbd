//! Yahoo Finance quotes for the equities behind tokenized stocks.

pub mod chart;
pub mod client;
pub mod ticker;

pub use chart::{parse_chart, StockData, MAX_CANDLES};
pub use client::YahooClient;
pub use ticker::resolve_ticker;

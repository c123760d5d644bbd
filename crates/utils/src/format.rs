//! Formatting utilities: market caps, USD amounts, dates.

/// Suffix table, largest first.
const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two decimals at most, trailing zeros dropped: `1.50` → `1.5`, `2.00` → `2`.
fn trim_number(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Format a USD market cap with a K/M/B/T suffix.
///
/// `0 → "$0"`, `999 → "$999"`, `1_000 → "$1K"`, `1_234_567 → "$1.23M"`,
/// `1e12 → "$1T"`. Values that round up to the next boundary roll over
/// (`999_999 → "$1M"`). Zero, negatives and non-finite values give `"$0"`.
pub fn format_market_cap(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "$0".to_string();
    }

    let unit = SUFFIXES.iter().position(|(divisor, _)| value >= *divisor);
    let mut idx = match unit {
        Some(i) => i,
        None => {
            let plain = round2(value);
            if plain < 1000.0 {
                return format!("${}", trim_number(plain));
            }
            SUFFIXES.len() - 1
        }
    };

    let mut scaled = round2(value / SUFFIXES[idx].0);
    if scaled >= 1000.0 && idx > 0 {
        idx -= 1;
        scaled = round2(value / SUFFIXES[idx].0);
    }
    format!("${}{}", trim_number(scaled), SUFFIXES[idx].1)
}

/// Parse a formatted market cap (`"$1.2B"`, `"$950K"`, `"$1,234"`) back to USD.
///
/// Returns `None` for anything unparsable and for zero (`"$0"` is not a value).
pub fn parse_market_cap(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last = cleaned.chars().last()?;
    let (number, multiplier) = match last.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        'T' => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };

    let value = number.parse::<f64>().ok()? * multiplier;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Insert thousands separators into the integer part of a decimal string.
fn group_thousands(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a USD amount: `$1,234.56` above one dollar, up to six decimals below.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    if value.abs() >= 1.0 {
        let s = format!("{:.2}", value.abs());
        let (int_part, frac) = s.split_once('.').unwrap_or((&s, "00"));
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}${}.{frac}", group_thousands(int_part))
    } else {
        let s = format!("{value:.6}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        format!("${s}")
    }
}

/// Format a price, rendering a missing (zero) price as `"N/A"`.
pub fn format_price_or_na(price: f64) -> String {
    if price.is_finite() && price > 0.0 {
        format_usd(price)
    } else {
        "N/A".to_string()
    }
}

fn utc(secs: i64) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(secs, 0)
}

/// Format a unix-seconds timestamp as `YYYY-MM-DD` (UTC).
pub fn format_date(secs: i64) -> String {
    utc(secs)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Format a unix-seconds timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(secs: i64) -> String {
    utc(secs)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

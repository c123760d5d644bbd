use std::collections::HashMap;

use vaulto_common::types::{is_evm_address, normalize_address};

/// Map a token address or symbol to an equity ticker.
///
/// 1. the configured address → ticker table (EVM addresses compare lowercased,
///    Solana mints exactly)
/// 2. a bare ticker or xStock symbol: `TSLAx` → `TSLA`, `aapl` → `AAPL`
///
/// Addresses missing from the table resolve to `None`.
pub fn resolve_ticker(input: &str, table: &HashMap<String, String>) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let evm = is_evm_address(input);
    let mapped = table.iter().find_map(|(address, ticker)| {
        let hit = if evm {
            normalize_address(address) == normalize_address(input)
        } else {
            address.trim() == input
        };
        hit.then(|| ticker.trim().to_ascii_uppercase())
    });
    if mapped.is_some() {
        return mapped;
    }

    if evm || input.len() > 12 {
        return None;
    }
    let symbol = match input.strip_suffix('x') {
        Some(base) if !base.is_empty() => base,
        _ => input,
    };
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    valid.then(|| symbol.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashMap<String, String> {
        HashMap::from([
            ("0xAbC0000000000000000000000000000000000001".to_string(), "tsla".to_string()),
            ("XsbEhLAtcf6HdfpFZ5xEMdqW8nfAvcsP5bdudRLJzJp".to_string(), "AAPL".to_string()),
        ])
    }

    #[test]
    fn test_table_lookup() {
        let t = table();
        assert_eq!(
            resolve_ticker("0xabc0000000000000000000000000000000000001", &t).as_deref(),
            Some("TSLA")
        );
        assert_eq!(
            resolve_ticker("XsbEhLAtcf6HdfpFZ5xEMdqW8nfAvcsP5bdudRLJzJp", &t).as_deref(),
            Some("AAPL")
        );
    }

    #[test]
    fn test_solana_mint_is_case_sensitive() {
        assert_eq!(resolve_ticker("xsbehlatcf6hdfpfz5xemdqw8nfavcsp5bdudrljzjp", &table()), None);
    }

    #[test]
    fn test_symbols() {
        let empty = HashMap::new();
        assert_eq!(resolve_ticker("TSLAx", &empty).as_deref(), Some("TSLA"));
        assert_eq!(resolve_ticker("nvda", &empty).as_deref(), Some("NVDA"));
        assert_eq!(resolve_ticker("BRK-B", &empty).as_deref(), Some("BRK-B"));
        assert_eq!(resolve_ticker("XOM", &empty).as_deref(), Some("XOM"));
    }

    #[test]
    fn test_unmapped_address_and_garbage() {
        let empty = HashMap::new();
        assert_eq!(resolve_ticker("0xabc0000000000000000000000000000000000002", &empty), None);
        assert_eq!(resolve_ticker("", &empty), None);
        assert_eq!(resolve_ticker("T$LA", &empty), None);
    }
}

use std::collections::HashSet;

use serde_json::json;
use tracing::{debug, warn};

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::Token;

use crate::queries::SEARCH_TOKENS;
use crate::schema::{decode, RawToken, SearchData};
use crate::{clamp_limit, UniswapModule};

impl UniswapModule {
    /// Tokens whose symbol or name contains `query` (case-insensitive),
    /// by TVL descending. Never fails: errors are logged and yield `[]`.
    pub async fn search_tokens(&self, chain_id: u64, query: &str, limit: u32) -> Vec<Token> {
        match self.try_search_tokens(chain_id, query, limit).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(chain_id, query, error = %e, "token search failed");
                Vec::new()
            }
        }
    }

    pub async fn try_search_tokens(
        &self,
        chain_id: u64,
        query: &str,
        limit: u32,
    ) -> VaultoResult<Vec<Token>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        if !self.supports_chain(chain_id) {
            return Err(VaultoError::UnsupportedChain(chain_id));
        }

        let limit = clamp_limit(limit);
        let data = self
            .transport
            .execute(chain_id, SEARCH_TOKENS, json!({ "query": query, "first": limit }))
            .await?;
        let found: SearchData = decode(data, "token search")?;
        let tokens = merge_search_rows(found.by_symbol, found.by_name, limit as usize);
        debug!(chain_id, query, hits = tokens.len(), "token search");
        Ok(tokens)
    }
}

/// Merge the symbol and name selections: dedupe by address, TVL descending,
/// truncate. `volume_usd` on each hit is the most recent day's volume.
pub(crate) fn merge_search_rows(by_symbol: Vec<RawToken>, by_name: Vec<RawToken>, limit: usize) -> Vec<Token> {
    let mut seen = HashSet::new();
    let mut tokens: Vec<Token> = by_symbol
        .into_iter()
        .chain(by_name)
        .filter_map(|raw| {
            let day_volume = raw.latest_day_volume();
            let mut token = Token::from(raw);
            if !seen.insert(token.address.clone()) {
                return None;
            }
            token.volume_usd = day_volume;
            Some(token)
        })
        .collect();
    tokens.sort_by(|a, b| b.tvl_usd.total_cmp(&a.tvl_usd));
    tokens.truncate(limit);
    tokens
}

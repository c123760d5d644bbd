//! GraphQL transport for the Uniswap v3 subgraphs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use vaulto_common::constants::uniswap_subgraph_id;
use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_types::config::SubgraphConfig;

use crate::PROTOCOL;

/// Executes a GraphQL document against the subgraph of one chain.
#[async_trait]
pub trait SubgraphTransport: Send + Sync {
    /// Whether a subgraph is known for this chain.
    fn supports_chain(&self, chain_id: u64) -> bool;

    /// POST `{query, variables}` and return the response's `data` object.
    async fn execute(&self, chain_id: u64, query: &str, variables: Value) -> VaultoResult<Value>;
}

/// HTTP client for The Graph gateway. No retries; one request per call.
pub struct SubgraphClient {
    http: reqwest::Client,
    gateway_url: String,
    api_key: String,
    /// Chain id → full endpoint URL, bypassing the gateway.
    overrides: HashMap<u64, String>,
    timeout: Duration,
}

impl SubgraphClient {
    pub fn new(config: &SubgraphConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let overrides = config
            .endpoints
            .iter()
            .filter_map(|(chain, url)| chain.trim().parse::<u64>().ok().map(|id| (id, url.clone())))
            .collect();

        Self {
            http,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            overrides,
            timeout,
        }
    }

    /// Endpoint URL for a chain: an override, else
    /// `{gateway}/{api_key}/subgraphs/id/{subgraph_id}`.
    pub fn endpoint(&self, chain_id: u64) -> VaultoResult<String> {
        if let Some(url) = self.overrides.get(&chain_id) {
            return Ok(url.clone());
        }
        let subgraph_id =
            uniswap_subgraph_id(chain_id).ok_or(VaultoError::UnsupportedChain(chain_id))?;
        if self.api_key.is_empty() {
            return Err(VaultoError::ApiKeyMissing("The Graph".into()));
        }
        Ok(format!(
            "{}/{}/subgraphs/id/{}",
            self.gateway_url, self.api_key, subgraph_id
        ))
    }

    fn transport_error(&self, chain_id: u64, err: reqwest::Error) -> VaultoError {
        if err.is_timeout() {
            VaultoError::ProtocolTimeout(format!(
                "subgraph query timed out after {}s (chain {chain_id})",
                self.timeout.as_secs()
            ))
        } else {
            VaultoError::Network(format!("subgraph request failed for chain {chain_id}: {err}"))
        }
    }
}

#[async_trait]
impl SubgraphTransport for SubgraphClient {
    fn supports_chain(&self, chain_id: u64) -> bool {
        self.overrides.contains_key(&chain_id) || uniswap_subgraph_id(chain_id).is_some()
    }

    async fn execute(&self, chain_id: u64, query: &str, variables: Value) -> VaultoResult<Value> {
        let url = self.endpoint(chain_id)?;
        let body = serde_json::json!({ "query": query, "variables": variables });
        debug!(chain_id, operation = crate::queries::operation_name(query), "subgraph query");

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(chain_id, e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| self.transport_error(chain_id, e))?;

        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(VaultoError::protocol(
                PROTOCOL,
                format!("HTTP {status} from chain {chain_id}: {snippet}"),
            ));
        }

        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| VaultoError::Parse(format!("subgraph response (chain {chain_id}): {e}")))?;

        if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(VaultoError::protocol(PROTOCOL, join_graphql_errors(errors)));
            }
        }

        match parsed.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(VaultoError::protocol(
                PROTOCOL,
                format!("response without data (chain {chain_id})"),
            )),
        }
    }
}

/// `errors[*].message` joined with `"; "`.
pub fn join_graphql_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ")
}

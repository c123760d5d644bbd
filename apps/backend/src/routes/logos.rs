use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use vaulto_common::error::VaultoError;
use vaulto_common::types::normalize_address;
use vaulto_mod_coingecko::contract_platform;
use vaulto_types::output::LogoResponse;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoQuery {
    chain_id: u64,
    address: String,
}

/// GET /api/token-logo?chainId&address: `logoUrl` is `null` when unknown.
/// Malformed addresses and chains without a CoinGecko platform are 400.
async fn token_logo(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LogoQuery>, QueryRejection>,
) -> ApiResult<Json<LogoResponse>> {
    let Query(q) = query?;
    if contract_platform(q.chain_id, &q.address)?.is_none() {
        return Err(VaultoError::UnsupportedChain(q.chain_id).into());
    }
    let logo_url = state
        .logos
        .resolve(&state.market.coingecko, q.chain_id, &q.address)
        .await;
    Ok(Json(LogoResponse {
        chain_id: q.chain_id,
        address: normalize_address(&q.address),
        logo_url,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/token-logo", get(token_logo))
}

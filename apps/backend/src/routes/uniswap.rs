//! Uniswap v3 endpoints: liquidity search and token details.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use vaulto_common::constants::MAX_HISTORY_DAYS;
use vaulto_types::output::{LiquidityResponse, TokenDetailsApiResponse};

use crate::error::ApiResult;
use crate::state::AppState;

/// History window when `days` is omitted.
const DEFAULT_DAYS: u32 = 30;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRequest {
    chain_id: u64,
    query: String,
    limit: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetailsQuery {
    chain_id: u64,
    address: String,
    days: Option<u32>,
}

/// POST /api/uniswap/liquidity: `{chainId, query, limit?}`.
async fn liquidity(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LiquidityRequest>, JsonRejection>,
) -> ApiResult<Json<LiquidityResponse>> {
    let Json(req) = body?;
    let resp = state.market.liquidity(req.chain_id, &req.query, req.limit).await?;
    Ok(Json(resp))
}

/// GET /api/uniswap/token-details?chainId&address&days (1..=365)
async fn token_details(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenDetailsQuery>, QueryRejection>,
) -> ApiResult<Json<TokenDetailsApiResponse>> {
    let Query(q) = query?;
    let days = q.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_HISTORY_DAYS);
    let details = state.market.token_details(q.chain_id, &q.address, days).await?;
    Ok(Json(details))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/uniswap/liquidity", post(liquidity))
        .route("/uniswap/token-details", get(token_details))
}

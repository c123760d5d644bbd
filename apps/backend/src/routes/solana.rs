use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use vaulto_common::constants::MAX_SOLANA_BATCH;
use vaulto_common::error::VaultoError;
use vaulto_types::output::SolanaTokenData;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TokenDataRequest {
    addresses: Vec<String>,
}

/// POST /api/solana/token-data: `{addresses: [mint, ...]}`, one entry per
/// mint in input order. At most `MAX_SOLANA_BATCH` mints.
async fn token_data(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TokenDataRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<SolanaTokenData>>> {
    let Json(req) = body?;
    if req.addresses.len() > MAX_SOLANA_BATCH {
        return Err(VaultoError::InvalidInput(format!(
            "at most {MAX_SOLANA_BATCH} addresses per request, got {}",
            req.addresses.len()
        ))
        .into());
    }
    Ok(Json(state.market.solana_token_data(&req.addresses).await))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/solana/token-data", post(token_data))
}

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use vaulto_common::error::VaultoError;
use vaulto_common::types::CoinPrice;
use vaulto_mod_coingecko::contract_platform;

use crate::error::ApiResult;
use crate::services::prices::PriceService;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    symbol: Option<String>,
    chain_id: Option<u64>,
    address: Option<String>,
}

/// GET /api/coingecko/price?symbol= | ?chainId&address
async fn price(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> ApiResult<Json<CoinPrice>> {
    let Query(q) = query?;
    let client = &state.market.coingecko;
    let cache = state.cache.as_ref();

    let (found, label) = match (q.symbol.as_deref().map(str::trim), q.chain_id, q.address) {
        (_, Some(chain_id), Some(address)) => {
            contract_platform(chain_id, &address)?;
            (
                PriceService::by_address(client, cache, chain_id, &address).await?,
                address,
            )
        }
        (Some(symbol), _, _) if !symbol.is_empty() => (
            PriceService::by_symbol(client, cache, symbol).await?,
            symbol.to_string(),
        ),
        _ => {
            return Err(VaultoError::InvalidInput("give symbol, or chainId and address".into()).into());
        }
    };
    Ok(Json(found.ok_or(VaultoError::TokenNotFound(label))?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/coingecko/price", get(price))
}

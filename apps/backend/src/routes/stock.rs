use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use vaulto_types::output::StockDataResponse;

use crate::clients::cache::{Cache, CacheTtl};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/token/:address/stock-data: accepts a mapped token address,
/// an xStock symbol or a bare ticker.
async fn stock_data(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<StockDataResponse>> {
    let cache_key = Cache::key("stock", &[address.trim()]);
    if let Some(cache) = &state.cache {
        if let Some(cached) = cache.get::<StockDataResponse>(&cache_key).await {
            return Ok(Json(cached));
        }
    }

    let data = state.market.stock_data(&address).await?;
    if let Some(cache) = &state.cache {
        cache.put(&cache_key, &data, CacheTtl::STOCK).await;
    }
    Ok(Json(data))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/token/:address/stock-data", get(stock_data))
}

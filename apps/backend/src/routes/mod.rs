//! API routes for the Vaulto backend.

pub mod health;
pub mod location;
pub mod logos;
pub mod prices;
pub mod solana;
pub mod stock;
pub mod uniswap;

use std::sync::Arc;
use axum::Router;
use crate::state::AppState;

/// Build the API router with all routes.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(location::router())
        .merge(uniswap::router())
        .merge(solana::router())
        .merge(stock::router())
        .merge(prices::router())
        .merge(logos::router())
}

//! Vaulto Swap backend: the market-data API the front end talks to.
//!
//! Everything is mounted under `/api`; handlers share one [`AppState`].

pub mod clients;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// The full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state)
}

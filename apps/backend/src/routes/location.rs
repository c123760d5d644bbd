//! Restricted-region check for the swap UI. Always answers 200.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};

use vaulto_types::output::LocationResponse;

use crate::state::AppState;

/// Country headers set by the edge, most trusted first.
const COUNTRY_HEADERS: &[&str] = &["cf-ipcountry", "x-vercel-ip-country"];

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Caller IP: first `x-forwarded-for` hop, then `x-real-ip`, then the socket.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header(headers, "x-real-ip"))
        .map(str::to_string)
        .or_else(|| peer.map(|p| p.ip().to_string()))
}

/// GET /api/check-location
async fn check_location(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Json<LocationResponse> {
    let edge_country = COUNTRY_HEADERS.iter().find_map(|h| header(&headers, h));
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    Json(state.geo.check(edge_country, ip.as_deref()).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/check-location", get(check_location))
}

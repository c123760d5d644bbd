//! Country lookup for the restricted-region check.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_types::config::GeoConfig;
use vaulto_types::output::LocationResponse;

/// Edge value for "country unknown".
const UNKNOWN_COUNTRY: &str = "XX";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    country_code: Option<String>,
    country: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

pub struct GeoClient {
    http: Client,
    config: GeoConfig,
}

impl GeoClient {
    pub fn new(config: &GeoConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build geolocation HTTP client");

        let mut config = config.clone();
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { http, config }
    }

    /// ISO country code for an IP via `{base}/{ip}/json/`.
    pub async fn country_for(&self, ip: IpAddr) -> VaultoResult<String> {
        let url = format!("{}/{}/json/", self.config.base_url, ip);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| VaultoError::Network(format!("geolocation lookup failed: {e}")))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(VaultoError::RateLimited("geolocation API 429".into()));
        }
        if !status.is_success() {
            return Err(VaultoError::protocol("geo", format!("HTTP {status}")));
        }

        let body: IpApiResponse = resp
            .json()
            .await
            .map_err(|e| VaultoError::Parse(format!("geolocation response: {e}")))?;
        if body.error {
            return Err(VaultoError::protocol(
                "geo",
                body.reason.unwrap_or_else(|| "lookup rejected".into()),
            ));
        }
        body.country_code
            .or(body.country)
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| VaultoError::protocol("geo", "no country in response"))
    }

    pub fn verdict(&self, country_code: &str) -> LocationResponse {
        let country_code = country_code.trim().to_ascii_uppercase();
        LocationResponse {
            is_restricted: self.config.is_restricted(&country_code),
            country_code: Some(country_code),
            error: None,
        }
    }

    /// Restricted-region check. The edge country header wins; otherwise the
    /// client IP is looked up. Every failure answers "not restricted".
    pub async fn check(&self, edge_country: Option<&str>, client_ip: Option<&str>) -> LocationResponse {
        if let Some(country) = edge_country
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(UNKNOWN_COUNTRY))
        {
            debug!(country, "location from edge header");
            return self.verdict(country);
        }

        let Some(raw) = client_ip.map(str::trim).filter(|ip| !ip.is_empty()) else {
            return LocationResponse::unrestricted_on_error("client IP unavailable");
        };
        let Ok(ip) = raw.parse::<IpAddr>() else {
            warn!(raw, "client IP does not parse, allowing");
            return LocationResponse::unrestricted_on_error("client IP invalid");
        };
        match self.country_for(ip).await {
            Ok(country) => self.verdict(&country),
            Err(e) => {
                warn!(%ip, error = %e, "geolocation failed, allowing");
                LocationResponse::unrestricted_on_error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn lookup(Path(ip): Path<String>) -> axum::response::Response {
        match ip.as_str() {
            "1.1.1.1" => Json(json!({ "ip": ip, "country_code": "us" })).into_response(),
            "2.2.2.2" => Json(json!({ "ip": ip, "country_code": "DE" })).into_response(),
            "10.0.0.1" => Json(json!({ "ip": ip, "error": true, "reason": "Reserved IP Address" })).into_response(),
            _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }

    async fn client() -> GeoClient {
        let app = Router::new().route("/:ip/json/", get(lookup));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        GeoClient::new(&GeoConfig {
            base_url: format!("http://{addr}/"),
            ..GeoConfig::default()
        })
    }

    #[tokio::test]
    async fn test_edge_header_wins() {
        let geo = client().await;
        let resp = geo.check(Some("kp"), Some("2.2.2.2")).await;
        assert!(resp.is_restricted);
        assert_eq!(resp.country_code.as_deref(), Some("KP"));
    }

    #[tokio::test]
    async fn test_unknown_edge_falls_back_to_ip() {
        let geo = client().await;
        let resp = geo.check(Some("XX"), Some("1.1.1.1")).await;
        assert!(resp.is_restricted);
        assert_eq!(resp.country_code.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn test_unrestricted_country() {
        let geo = client().await;
        let resp = geo.check(None, Some("2.2.2.2")).await;
        assert_eq!(resp, LocationResponse {
            is_restricted: false,
            country_code: Some("DE".into()),
            error: None,
        });
    }

    #[tokio::test]
    async fn test_failures_fail_open() {
        let geo = client().await;

        let reserved = geo.check(None, Some("10.0.0.1")).await;
        assert!(!reserved.is_restricted);
        assert!(reserved.error.unwrap().contains("Reserved IP Address"));

        let down = geo.check(None, Some("3.3.3.3")).await;
        assert!(!down.is_restricted);
        assert!(down.error.is_some());

        let no_ip = geo.check(None, None).await;
        assert_eq!(no_ip, LocationResponse::unrestricted_on_error("client IP unavailable"));
    }

    #[tokio::test]
    async fn test_unparseable_ip_is_not_looked_up() {
        let geo = client().await;
        for raw in ["1.1.1.1/../../admin", "../json", "not-an-ip", "1.1.1.1?x="] {
            let resp = geo.check(None, Some(raw)).await;
            assert_eq!(resp, LocationResponse::unrestricted_on_error("client IP invalid"), "{raw}");
        }
        // IPv6 still reaches the lookup (and fails open on the stub's 503).
        let v6 = geo.check(None, Some("2001:db8::1")).await;
        assert!(!v6.is_restricted);
        assert_ne!(v6.error.as_deref(), Some("client IP invalid"));
    }
}

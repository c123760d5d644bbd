//! Universal error types for Vaulto.
//!
//! Every error carries a structured detail:
//! - **code**: machine-readable error code (e.g. `UNSUPPORTED_CHAIN`)
//! - **category**: error class (`auth`, `config`, `network`, `validation`, `not_found`, `system`)
//! - **recoverable**: whether the caller can retry or fix the input
//! - **hints**: actionable suggestions for recovery
//!
//! JSON output format:
//! ```json
//! {
//!   "ok": false,
//!   "error": {
//!     "code": "SUBGRAPH_TIMEOUT",
//!     "message": "subgraph query timed out after 10s (chain 1)",
//!     "category": "network",
//!     "recoverable": true,
//!     "hints": ["Retry, the gateway may be temporarily slow"]
//!   }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Error category: determines HTTP status and CLI exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Auth,
    Config,
    Network,
    Validation,
    NotFound,
    System,
}

impl ErrorCategory {
    /// CLI exit code: 1 user error, 2 network, 3 system.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Auth
            | ErrorCategory::Config
            | ErrorCategory::Validation
            | ErrorCategory::NotFound => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::System => 3,
        }
    }

    /// HTTP status code the backend answers with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Auth
            | ErrorCategory::Config
            | ErrorCategory::Network
            | ErrorCategory::System => 500,
        }
    }
}

/// Structured error detail for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

/// Top-level error type for all Vaulto operations.
#[derive(Debug, Error)]
pub enum VaultoError {
    // ── Auth ─────────────────────────────────────────────────────────
    #[error("API key missing for {0}")]
    ApiKeyMissing(String),

    // ── Config ───────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Network ─────────────────────────────────────────────────────
    #[error("Protocol error ({protocol}): {message}")]
    Protocol { protocol: String, message: String },

    #[error("Protocol timeout: {0}")]
    ProtocolTimeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),

    // ── Not found ────────────────────────────────────────────────────
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    // ── System ───────────────────────────────────────────────────────
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultoError {
    /// Shorthand for a protocol-level upstream failure.
    pub fn protocol(protocol: &str, message: impl Into<String>) -> Self {
        VaultoError::Protocol {
            protocol: protocol.to_string(),
            message: message.into(),
        }
    }

    /// Get the structured error detail for JSON output.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            VaultoError::ApiKeyMissing(service) => ErrorDetail {
                code: "API_KEY_MISSING".into(),
                message: self.to_string(),
                category: ErrorCategory::Auth,
                recoverable: true,
                hints: vec![format!("Set the {service} API key in config.toml or the environment")],
            },
            VaultoError::Config(msg) => ErrorDetail {
                code: "CONFIG_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::Config,
                recoverable: true,
                hints: vec!["Check ~/.vaulto/config.toml".into()],
            },
            VaultoError::Protocol { protocol, message } => ErrorDetail {
                code: "PROTOCOL_ERROR".into(),
                message: format!("{protocol}: {message}"),
                category: ErrorCategory::Network,
                recoverable: true,
                hints: vec![],
            },
            VaultoError::ProtocolTimeout(msg) => ErrorDetail {
                code: "PROTOCOL_TIMEOUT".into(),
                message: msg.clone(),
                category: ErrorCategory::Network,
                recoverable: true,
                hints: vec!["Retry, the upstream may be temporarily slow".into()],
            },
            VaultoError::RateLimited(msg) => ErrorDetail {
                code: "RATE_LIMITED".into(),
                message: msg.clone(),
                category: ErrorCategory::Network,
                recoverable: true,
                hints: vec!["Wait a few seconds and retry".into()],
            },
            VaultoError::Network(msg) => ErrorDetail {
                code: "NETWORK_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::Network,
                recoverable: true,
                hints: vec!["Check network connectivity".into()],
            },
            VaultoError::InvalidInput(msg) => ErrorDetail {
                code: "INVALID_INPUT".into(),
                message: msg.clone(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec![],
            },
            VaultoError::InvalidAddress(addr) => ErrorDetail {
                code: "INVALID_ADDRESS".into(),
                message: self.to_string(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec![format!("Expected a 0x-prefixed 20-byte hex address, got '{addr}'")],
            },
            VaultoError::UnsupportedChain(_) => ErrorDetail {
                code: "UNSUPPORTED_CHAIN".into(),
                message: self.to_string(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec!["Supported chains: 1, 10, 137, 8453, 42161".into()],
            },
            VaultoError::TokenNotFound(_) => ErrorDetail {
                code: "TOKEN_NOT_FOUND".into(),
                message: self.to_string(),
                category: ErrorCategory::NotFound,
                recoverable: false,
                hints: vec![],
            },
            VaultoError::TickerNotFound(_) => ErrorDetail {
                code: "TICKER_NOT_FOUND".into(),
                message: self.to_string(),
                category: ErrorCategory::NotFound,
                recoverable: false,
                hints: vec![],
            },
            VaultoError::Parse(msg) => ErrorDetail {
                code: "PARSE_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::System,
                recoverable: false,
                hints: vec![],
            },
            VaultoError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::System,
                recoverable: false,
                hints: vec![],
            },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.detail().category
    }

    /// Exit code: 0 success, 1 user error, 2 network, 3 system.
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// Serialize this error as the JSON error envelope.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "error": self.detail(),
        })
    }
}

pub type VaultoResult<T> = Result<T, VaultoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_timeout() {
        let err = VaultoError::ProtocolTimeout("subgraph query timed out after 10s (chain 1)".into());
        let detail = err.detail();
        assert_eq!(detail.code, "PROTOCOL_TIMEOUT");
        assert_eq!(detail.category, ErrorCategory::Network);
        assert!(detail.recoverable);
        assert!(!detail.hints.is_empty());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(VaultoError::UnsupportedChain(999).category().http_status(), 400);
        assert_eq!(VaultoError::InvalidInput("x".into()).category().http_status(), 400);
        assert_eq!(VaultoError::TokenNotFound("0xabc".into()).category().http_status(), 404);
        assert_eq!(VaultoError::Network("down".into()).category().http_status(), 500);
        assert_eq!(VaultoError::ApiKeyMissing("The Graph".into()).category().http_status(), 500);
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(VaultoError::InvalidAddress("nope".into()).exit_code(), 1);
        assert_eq!(VaultoError::Network("timeout".into()).exit_code(), 2);
        assert_eq!(VaultoError::Internal("bug".into()).exit_code(), 3);
    }

    #[test]
    fn test_error_json_format() {
        let err = VaultoError::RateLimited("CoinGecko 429".into());
        let json = err.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "RATE_LIMITED");
        assert_eq!(json["error"]["category"], "network");
        assert!(json["error"]["hints"].is_array());
    }

    #[test]
    fn test_error_json_no_empty_hints() {
        let detail = VaultoError::Parse("bad json".into()).detail();
        let serialized = serde_json::to_string(&detail).unwrap();
        assert!(!serialized.contains("\"hints\""));
    }

    #[test]
    fn test_protocol_error_detail() {
        let err = VaultoError::protocol("uniswap-subgraph", "indexing error; bad block");
        let detail = err.detail();
        assert_eq!(detail.code, "PROTOCOL_ERROR");
        assert!(detail.message.starts_with("uniswap-subgraph: "));
    }

    #[test]
    fn test_not_found_category() {
        let detail = VaultoError::TickerNotFound("ZZZZ".into()).detail();
        assert_eq!(detail.category, ErrorCategory::NotFound);
        assert_eq!(detail.category.exit_code(), 1);
        let json = serde_json::to_value(detail.category).unwrap();
        assert_eq!(json, "not_found");
    }
}

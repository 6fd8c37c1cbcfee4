//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across all workspace crates. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx) - Caller input issues
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!
//! 2. **Upstream Errors** (502) - External services misbehaving
//!    - [`Upstream`](AppError::Upstream) → Helius / Axiom transport or RPC failure
//!    - [`Unauthorized`](AppError::Unauthorized) → Axiom rejected the credential pair
//!
//! 3. **Server Errors** (5xx) - Internal/system issues
//!    - [`Config`](AppError::Config), [`Decoding`](AppError::Decoding),
//!      [`Internal`](AppError::Internal) → 500
//!
//! Token lookups never surface upstream errors to HTTP callers: the aggregator turns
//! them into a degraded record. The variants still matter for the clients themselves,
//! which report *why* a source was unusable.

use thiserror::Error;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// External HTTP or JSON-RPC failure (network, non-success status, RPC error envelope).
    ///
    /// **HTTP Status**: 502 Bad Gateway
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The trading API rejected the current credentials, or refreshing them failed.
    ///
    /// **HTTP Status**: 502 Bad Gateway (the caller is not the one unauthorized)
    #[error("Unauthorized upstream: {0}")]
    Unauthorized(String),

    /// Response body could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid user input validation error.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Requested resource not found.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Unauthorized(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) | AppError::Decoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Upstream(_) | AppError::Unauthorized(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Decoding(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Short variant name used as the `code` field of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Upstream(_) => "Upstream",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Decoding(_) => "Decoding",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Internal(_) => "Internal",
            AppError::NotFound(_) => "NotFound",
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::debug!("Client error: {}", self);
            }
            _ => {
                tracing::error!("Server error: {}", self);
            }
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

/// Convert `reqwest::Error` to `AppError`.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decoding(format!("Response body error: {}", err))
        } else {
            AppError::Upstream(format!("HTTP error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Upstream("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Decoding("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_details_are_hidden() {
        let err = AppError::Upstream("helius said api-key=abc is invalid".into());
        assert_eq!(err.user_message(), "Service temporarily unavailable");
        assert_eq!(err.code(), "Upstream");
    }

    #[test]
    fn test_serde_error_becomes_decoding() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, AppError::Decoding(_)));
    }
}

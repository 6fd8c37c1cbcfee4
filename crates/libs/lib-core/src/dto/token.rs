//! # Token API Data Transfer Objects
//!
//! Bodies for the token, credential and tool-call endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /api/token/details` - [`TokenDetailsRequest`]
//! - `GET /api/token/{address}/chart` - [`ChartData`]
//! - `GET /api/credentials/status` - [`CredentialStatus`]
//! - `POST /api/credentials/refresh` - [`RefreshResponse`]
//! - `POST /api/tools/call` - [`ToolCallRequest`]
//!
//! ## Wire Format
//!
//! Field names are **snake_case** (default serde behavior), matching the
//! `token_address` argument name the tool definitions advertise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/token/details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetailsRequest {
    pub token_address: String,
}

/// One point of a price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    pub price: f64,
}

/// Chart data for a token. No price history provider is wired yet, so `prices` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub token_address: String,
    pub prices: Vec<PricePoint>,
}

impl ChartData {
    pub fn empty(token_address: impl Into<String>) -> Self {
        Self {
            token_address: token_address.into(),
            prices: Vec::new(),
        }
    }
}

/// Expiry view of the trading API credentials. Token values are never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStatus {
    pub expires_at: DateTime<Utc>,
    /// Seconds until expiry; negative once expired
    pub expires_in_secs: i64,
    pub expired: bool,
}

/// Result of a forced credential refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub refreshed: bool,
    #[serde(flatten)]
    pub status: CredentialStatus,
}

/// Body of `POST /api/tools/call`, shaped like a function-calling tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

//! # Helius Asset Lookup
//!
//! Unauthenticated JSON-RPC calls against a Helius endpoint
//! (`https://mainnet.helius-rpc.com/?api-key={key}`):
//!
//! - `getAsset` (DAS) for name, symbol, description, supply and decimals
//! - `getTokenLargestAccounts` for the largest holder accounts
//!
//! A token the indexer does not know yields an empty result, not an error; only
//! transport failures and JSON-RPC error envelopes are reported as errors.

// region: --- Modules
pub mod types;
// endregion: --- Modules

pub use types::{HolderAccount, RawAssetData, RawHolderData};

use crate::retry::RetryPolicy;
use lib_core::{AppError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use types::{RpcRequest, RpcResponse};

/// Builder for configuring [`AssetLookupClient`].
#[derive(Debug, Clone)]
pub struct AssetLookupClientBuilder {
    timeout: Duration,
    rpc_url: Option<String>,
    retry: RetryPolicy,
}

impl Default for AssetLookupClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            rpc_url: None,
            retry: RetryPolicy::single_shot(),
        }
    }
}

impl AssetLookupClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the full RPC URL (API key included).
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<AssetLookupClient> {
        let rpc_url = self
            .rpc_url
            .ok_or_else(|| AppError::Config("Helius RPC URL is required".to_string()))?;

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(AssetLookupClient {
            http,
            rpc_url,
            retry: self.retry,
        })
    }
}

/// Client for the Helius asset and holder lookups.
pub struct AssetLookupClient {
    http: Client,
    rpc_url: String,
    retry: RetryPolicy,
}

impl AssetLookupClient {
    pub fn builder() -> AssetLookupClientBuilder {
        AssetLookupClientBuilder::default()
    }

    /// `getAsset` for a mint address.
    #[instrument(skip(self))]
    pub async fn fetch_asset(&self, token_address: &str) -> Result<RawAssetData> {
        let request = RpcRequest::new("get-asset", "getAsset", serde_json::json!({ "id": token_address }));
        let asset: RawAssetData = self.call(&request).await?;
        debug!("[HELIUS] getAsset {}: empty={}", token_address, asset.is_empty());
        Ok(asset)
    }

    /// `getTokenLargestAccounts` for a mint address.
    #[instrument(skip(self))]
    pub async fn fetch_largest_holders(&self, token_address: &str) -> Result<RawHolderData> {
        let request = RpcRequest::new("get-holders", "getTokenLargestAccounts", [token_address]);
        let holders: RawHolderData = self.call(&request).await?;
        debug!("[HELIUS] getTokenLargestAccounts {}: {} accounts", token_address, holders.accounts().len());
        Ok(holders)
    }

    async fn call<P, T>(&self, request: &RpcRequest<P>) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned + Default,
    {
        let mut attempt = 0;
        loop {
            match self.call_once(request).await {
                Ok(result) => return Ok(result),
                Err(e) if self.retry.has_attempts_left(attempt) => {
                    warn!("[HELIUS] {} failed ({}), retrying", request.method, e);
                    self.retry.pause(attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_once<P, T>(&self, request: &RpcRequest<P>) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned + Default,
    {
        let response = self.http.post(&self.rpc_url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("{} returned HTTP {}", request.method, status)));
        }

        let envelope: RpcResponse<T> = response.json().await?;
        if let Some(err) = envelope.error {
            return Err(AppError::Upstream(format!(
                "{} RPC error {}: {}",
                request.method, err.code, err.message
            )));
        }

        Ok(envelope.result.unwrap_or_default())
    }
}

// endregion: --- Tests

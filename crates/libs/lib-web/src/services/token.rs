//! # Token Service
//!
//! Business logic behind the token endpoints: address validation, the aggregated
//! token lookup, chart data, and credential status for the Axiom session.
//!
//! ## Architecture
//!
//! ```text
//! TokenService → TokenAggregator → (AssetLookupClient ∥ MarketFeedClient)
//!              → CredentialRefresher → CredentialStore
//! ```
//!
//! ## Error Handling
//!
//! Only malformed addresses surface as errors (`AppError::InvalidInput`). Source
//! failures are absorbed by the aggregator and show up as sentinel values in the
//! returned [`TokenRecord`].

use lib_core::dto::{ChartData, CredentialStatus, RefreshResponse};
use lib_core::{AppError, Result};
use lib_solana::{SolanaState, TokenRecord};
use lib_utils::validate_solana_address;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Service for token detail and credential operations.
pub struct TokenService {
    solana: Arc<SolanaState>,
}

impl TokenService {
    pub fn new(solana: Arc<SolanaState>) -> Self {
        Self { solana }
    }

    /// Aggregated details for one mint.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenRecord)` - Always, once the address is well-formed. Upstream
    ///   failures are reported inside the record.
    /// * `Err(AppError::InvalidInput)` - Not a base58 32-byte address
    #[instrument(skip(self))]
    pub async fn get_token_details(&self, token_address: &str) -> Result<TokenRecord> {
        let token_address = check_address(token_address)?;
        let record = self.solana.aggregator.get_token_details(token_address).await;

        if record.error.is_some() {
            warn!("[TOKEN] No usable source for {}", token_address);
        } else {
            info!("[TOKEN] Details ready for {} ({})", token_address, record.symbol);
        }
        Ok(record)
    }

    /// Price history for a mint. No price source is wired in, so the series is empty.
    #[instrument(skip(self))]
    pub async fn get_chart_data(&self, token_address: &str) -> Result<ChartData> {
        let token_address = check_address(token_address)?;
        Ok(ChartData::empty(token_address))
    }

    /// Expiry of the current Axiom credential pair. Token values never leave the store.
    pub async fn credential_status(&self) -> CredentialStatus {
        let pair = self.solana.credentials.get().await;
        status_of(&pair)
    }

    /// Force a credential refresh and report the resulting expiry.
    #[instrument(skip(self))]
    pub async fn refresh_credentials(&self) -> RefreshResponse {
        let refreshed = self.solana.refresher.refresh().await;
        if !refreshed {
            warn!("[AUTH] Manual credential refresh failed");
        }
        RefreshResponse {
            refreshed,
            status: self.credential_status().await,
        }
    }
}

fn check_address(token_address: &str) -> Result<&str> {
    let token_address = token_address.trim();
    validate_solana_address(token_address, "token_address").map_err(AppError::InvalidInput)?;
    Ok(token_address)
}

fn status_of(pair: &lib_solana::axiom::CredentialPair) -> CredentialStatus {
    let expires_in_secs = pair.expires_in().num_seconds();
    CredentialStatus {
        expires_at: pair.expires_at,
        expires_in_secs,
        expired: expires_in_secs <= 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{state_for, MINT};
    use lib_solana::test_support::{asset_result, holders_result, market_item, MockUpstream, Scripted};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_token_details_rejects_malformed_address() {
        let mock = MockUpstream::start().await;
        let service = TokenService::new(state_for(&mock));

        let err = service.get_token_details("not-a-mint").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(mock.asset.hits(), 0);
        assert_eq!(mock.trending.hits(), 0);
    }

    #[tokio::test]
    async fn test_get_token_details_trims_and_merges() {
        let mock = MockUpstream::start().await;
        mock.asset.push(Scripted::rpc_result(asset_result("Bonk", "BONK", 1_000_000_000.0, 6)));
        mock.holders.push(Scripted::rpc_result(holders_result(&[100.0, 50.0])));
        mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Bonk", "BONK")])));
        let service = TokenService::new(state_for(&mock));

        let record = service.get_token_details(&format!("  {}  ", MINT)).await.unwrap();

        assert_eq!(record.token_address, MINT);
        assert_eq!(record.symbol, "BONK");
        assert_eq!(record.holders, 2);
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_chart_data_is_empty_series() {
        let mock = MockUpstream::start().await;
        let service = TokenService::new(state_for(&mock));

        let chart = service.get_chart_data(MINT).await.unwrap();

        assert_eq!(chart.token_address, MINT);
        assert!(chart.prices.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_credentials_reports_outcome() {
        let mock = MockUpstream::start().await;
        mock.refresh.push(Scripted::raw(500, "down"));
        let service = TokenService::new(state_for(&mock));

        let response = service.refresh_credentials().await;

        assert!(!response.refreshed);
        assert!(!response.status.expired);
        assert!(response.status.expires_in_secs > 800);
    }
}

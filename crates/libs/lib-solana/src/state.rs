//! # Token Intelligence State
//!
//! Wires the credential lifecycle, both upstream clients and the aggregator
//! into one container shared across the application (axum state, tool dispatch).
//!
//! ```text
//! ┌─────────────────┐
//! │  SolanaState    │  ← Main state container
//! └────────┬────────┘
//!          │
//!          ├─► CredentialStore      (Axiom cookie pair + expiry)
//!          ├─► CredentialRefresher  (single writer of the store)
//!          ├─► MarketFeedClient     (Axiom trending feed)
//!          ├─► AssetLookupClient    (Helius getAsset / getTokenLargestAccounts)
//!          └─► TokenAggregator      (merge into TokenRecord)
//! ```
//!
//! All components are Arc-wrapped; the store is owned here rather than living in
//! a process-wide global.

use crate::aggregator::TokenAggregator;
use crate::axiom::{CredentialRefresher, CredentialStore, MarketFeedClient, RefreshScheduler};
use crate::helius::AssetLookupClient;
use crate::retry::RetryPolicy;
use lib_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

pub struct SolanaState {
    pub credentials: Arc<CredentialStore>,
    pub refresher: Arc<CredentialRefresher>,
    pub market: Arc<MarketFeedClient>,
    pub assets: Arc<AssetLookupClient>,
    pub aggregator: Arc<TokenAggregator>,
    refresh_interval: Duration,
    refresh_threshold: Duration,
}

impl SolanaState {
    /// Build every component from configuration. Performs no network I/O.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = Arc::new(CredentialStore::new(
            config.axiom_refresh_token.clone(),
            config.axiom_access_token.clone(),
            config.credential_ttl,
        ));

        let refresher = Arc::new(CredentialRefresher::new(
            Arc::clone(&credentials),
            &config.axiom_auth_url,
            config.credential_ttl,
            config.http_timeout,
        )?);

        let market = Arc::new(
            MarketFeedClient::builder()
                .api_base(config.axiom_api_url.clone())
                .time_period(config.axiom_time_period.clone())
                .timeout(config.http_timeout)
                .retry_policy(RetryPolicy::market_feed().with_max_attempts(config.market_max_attempts))
                .build(Arc::clone(&refresher))?,
        );

        let assets = Arc::new(
            AssetLookupClient::builder()
                .rpc_url(config.helius_rpc_url.clone())
                .timeout(config.http_timeout)
                .build()?,
        );

        let aggregator = Arc::new(TokenAggregator::new(
            Arc::clone(&assets),
            Arc::clone(&market),
            config.source_deadline,
        ));

        info!(
            "[STATE] Token state ready (axiom: {}, helius: {})",
            config.axiom_api_url,
            config.helius_rpc_url_redacted()
        );

        Ok(Self {
            credentials,
            refresher,
            market,
            assets,
            aggregator,
            refresh_interval: config.refresh_interval,
            refresh_threshold: config.refresh_threshold,
        })
    }

    /// Scheduler configured with this state's interval and threshold.
    pub fn scheduler(&self) -> RefreshScheduler {
        RefreshScheduler::new(Arc::clone(&self.refresher), self.refresh_interval, self.refresh_threshold)
    }

    /// Start the background credential refresh (one immediate refresh, then periodic checks).
    pub fn start_background_refresh(&self) -> JoinHandle<()> {
        info!(
            "[STATE] Background credential refresh started ({}s interval, {}s threshold)",
            self.refresh_interval.as_secs(),
            self.refresh_threshold.as_secs()
        );
        self.scheduler().spawn()
    }
}

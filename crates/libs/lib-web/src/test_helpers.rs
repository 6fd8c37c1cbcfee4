//! Shared fixtures for handler and service tests.

use lib_core::Config;
use lib_solana::test_support::MockUpstream;
use lib_solana::SolanaState;
use std::sync::Arc;
use std::time::Duration;

/// BONK mint; a well-formed 32-byte address.
pub const MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

pub fn test_config(mock: &MockUpstream) -> Config {
    Config {
        axiom_refresh_token: "seed-refresh".to_string(),
        axiom_access_token: "seed-access".to_string(),
        axiom_api_url: mock.base_url.clone(),
        axiom_auth_url: mock.base_url.clone(),
        axiom_time_period: "1h".to_string(),
        helius_rpc_url: mock.rpc_url(),
        credential_ttl: Duration::from_secs(900),
        refresh_interval: Duration::from_secs(30),
        refresh_threshold: Duration::from_secs(60),
        http_timeout: Duration::from_secs(5),
        source_deadline: Duration::from_secs(5),
        market_max_attempts: 2,
    }
}

pub fn state_for(mock: &MockUpstream) -> Arc<SolanaState> {
    Arc::new(SolanaState::new(&test_config(mock)).unwrap())
}

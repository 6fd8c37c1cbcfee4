//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The loaded [`Config`] is handed to `SolanaState::new` and stored in the axum
//! state; there is no process-wide global.
//!
//! ## Variables
//!
//! | Variable | Default |
//! |---|---|
//! | `AXIOM_AUTH_REFRESH_TOKEN` | required |
//! | `AXIOM_AUTH_ACCESS_TOKEN` | required |
//! | `HELIUS_API_KEY` / `HELIUS_RPC_URL` | one of them required |
//! | `AXIOM_API_URL` | `https://api2.axiom.trade` |
//! | `AXIOM_AUTH_URL` | `https://api.axiom.trade` |
//! | `AXIOM_TIME_PERIOD` | `1h` |
//! | `CREDENTIAL_TTL_SECS` | `900` |
//! | `REFRESH_INTERVAL_SECS` | `30` |
//! | `REFRESH_THRESHOLD_SECS` | `60` |
//! | `HTTP_TIMEOUT_SECS` | `10` |
//! | `SOURCE_DEADLINE_SECS` | `20` |
//! | `MARKET_MAX_ATTEMPTS` | `2` |

use lib_utils::envs::{get_env, get_env_opt, get_env_parse_or};
use std::time::Duration;

pub const DEFAULT_AXIOM_API_URL: &str = "https://api2.axiom.trade";
pub const DEFAULT_AXIOM_AUTH_URL: &str = "https://api.axiom.trade";
pub const HELIUS_MAINNET_URL: &str = "https://mainnet.helius-rpc.com";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Seed refresh credential for the Axiom trading API
    pub axiom_refresh_token: String,

    /// Seed access credential for the Axiom trading API
    pub axiom_access_token: String,

    /// Base URL of the market feed (`/meme-trending` lives here)
    pub axiom_api_url: String,

    /// Base URL of the auth endpoint (`/refresh-access-token` lives here)
    pub axiom_auth_url: String,

    /// Rolling window requested from the trending feed (e.g. "1h")
    pub axiom_time_period: String,

    /// Full Helius JSON-RPC URL, API key included
    pub helius_rpc_url: String,

    /// Lifetime stamped on each credential write
    pub credential_ttl: Duration,

    /// Background scheduler tick
    pub refresh_interval: Duration,

    /// Refresh when the access credential expires within this window
    pub refresh_threshold: Duration,

    /// Transport timeout for every outbound call
    pub http_timeout: Duration,

    /// Upper bound for one source inside a single aggregation
    pub source_deadline: Duration,

    /// Total attempts allowed per market feed fetch
    pub market_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let axiom_refresh_token = get_env("AXIOM_AUTH_REFRESH_TOKEN")
            .map_err(|_| "AXIOM_AUTH_REFRESH_TOKEN must be set in environment")?;
        let axiom_access_token = get_env("AXIOM_AUTH_ACCESS_TOKEN")
            .map_err(|_| "AXIOM_AUTH_ACCESS_TOKEN must be set in environment")?;

        let helius_rpc_url = match (get_env_opt("HELIUS_RPC_URL"), get_env_opt("HELIUS_API_KEY")) {
            (Some(url), _) => url,
            (None, Some(key)) => helius_url_for_key(&key),
            (None, None) => return Err("Either HELIUS_RPC_URL or HELIUS_API_KEY must be set".to_string()),
        };

        Ok(Self {
            axiom_refresh_token,
            axiom_access_token,
            axiom_api_url: get_env_opt("AXIOM_API_URL").unwrap_or_else(|| DEFAULT_AXIOM_API_URL.to_string()),
            axiom_auth_url: get_env_opt("AXIOM_AUTH_URL").unwrap_or_else(|| DEFAULT_AXIOM_AUTH_URL.to_string()),
            axiom_time_period: get_env_opt("AXIOM_TIME_PERIOD").unwrap_or_else(|| "1h".to_string()),
            helius_rpc_url,
            credential_ttl: secs("CREDENTIAL_TTL_SECS", 900)?,
            refresh_interval: secs("REFRESH_INTERVAL_SECS", 30)?,
            refresh_threshold: secs("REFRESH_THRESHOLD_SECS", 60)?,
            http_timeout: secs("HTTP_TIMEOUT_SECS", 10)?,
            source_deadline: secs("SOURCE_DEADLINE_SECS", 20)?,
            market_max_attempts: get_env_parse_or("MARKET_MAX_ATTEMPTS", 2u32)
                .map_err(|e| format!("MARKET_MAX_ATTEMPTS must be a valid number: {}", e))?,
        })
    }

    /// Validate configuration values against business rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.axiom_refresh_token.trim().is_empty() || self.axiom_access_token.trim().is_empty() {
            return Err("Axiom seed credentials cannot be empty".to_string());
        }

        if !self.helius_rpc_url.starts_with("http") {
            return Err("HELIUS_RPC_URL must be an http(s) URL".to_string());
        }

        if self.credential_ttl.is_zero()
            || self.refresh_interval.is_zero()
            || self.http_timeout.is_zero()
            || self.source_deadline.is_zero()
        {
            return Err(
                "CREDENTIAL_TTL_SECS, REFRESH_INTERVAL_SECS, HTTP_TIMEOUT_SECS and SOURCE_DEADLINE_SECS must be positive"
                    .to_string(),
            );
        }

        if self.refresh_threshold >= self.credential_ttl {
            return Err("REFRESH_THRESHOLD_SECS must be smaller than CREDENTIAL_TTL_SECS".to_string());
        }

        if self.market_max_attempts == 0 {
            return Err("MARKET_MAX_ATTEMPTS must be at least 1".to_string());
        }

        Ok(())
    }

    /// Helius RPC URL with the `api-key` query value masked, for logs.
    pub fn helius_rpc_url_redacted(&self) -> String {
        match self.helius_rpc_url.split_once("api-key=") {
            Some((head, _)) => format!("{}api-key=***", head),
            None => self.helius_rpc_url.clone(),
        }
    }
}

/// Build the mainnet Helius RPC URL for an API key.
pub fn helius_url_for_key(key: &str) -> String {
    format!("{}/?api-key={}", HELIUS_MAINNET_URL, key)
}

fn secs(name: &'static str, default: u64) -> Result<Duration, String> {
    get_env_parse_or(name, default)
        .map(Duration::from_secs)
        .map_err(|e| format!("{} must be a valid number of seconds: {}", name, e))
}

// Credentials must never reach logs through `{:?}`.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("axiom_api_url", &self.axiom_api_url)
            .field("axiom_auth_url", &self.axiom_auth_url)
            .field("axiom_time_period", &self.axiom_time_period)
            .field("helius_rpc_url", &self.helius_rpc_url_redacted())
            .field("credential_ttl", &self.credential_ttl)
            .field("refresh_interval", &self.refresh_interval)
            .field("refresh_threshold", &self.refresh_threshold)
            .field("http_timeout", &self.http_timeout)
            .field("source_deadline", &self.source_deadline)
            .field("market_max_attempts", &self.market_max_attempts)
            .finish_non_exhaustive()
    }
}

// endregion: --- Tests

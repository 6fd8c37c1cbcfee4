//! # Credential Refresher
//!
//! Exchanges the refresh cookie for a new access cookie at
//! `POST {auth_base}/refresh-access-token` and writes the result into the
//! [`CredentialStore`]. This is the store's only writer.
//!
//! ## Single flight
//!
//! Refreshes are serialized by a mutex. A caller that queued behind a refresh
//! which succeeded returns `true` without calling Axiom again, so a burst of
//! 401s turns into one network exchange.
//!
//! ## Scheduling
//!
//! [`RefreshScheduler`] refreshes once on startup, then wakes every interval and
//! refreshes whenever the access cookie expires within the threshold.

use super::credentials::CredentialStore;
use super::{browser_headers, trim_base};
use lib_core::{AppError, Result};
use lib_utils::format_time;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const ACCESS_COOKIE: &str = "auth-access-token";
pub const REFRESH_COOKIE: &str = "auth-refresh-token";

/// Refreshes the Axiom credentials held in a shared [`CredentialStore`].
pub struct CredentialRefresher {
    http: Client,
    refresh_url: String,
    store: Arc<CredentialStore>,
    ttl: Duration,
    in_flight: Mutex<()>,
}

impl CredentialRefresher {
    /// Create a refresher writing into `store`.
    ///
    /// # Arguments
    /// * `auth_base` - Auth API base, e.g. `https://api.axiom.trade`
    /// * `ttl` - Lifetime stamped on every new access cookie
    /// * `timeout` - Transport timeout of the refresh call
    pub fn new(store: Arc<CredentialStore>, auth_base: &str, ttl: Duration, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            refresh_url: format!("{}/refresh-access-token", trim_base(auth_base)),
            store,
            ttl,
            in_flight: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Refresh the access credential.
    ///
    /// Returns `true` once the store holds a freshly issued pair, `false` if
    /// the exchange failed (store left untouched). Never errors.
    pub async fn refresh(&self) -> bool {
        let seen = self.store.version().await;
        let _guard = self.in_flight.lock().await;

        if self.store.version().await != seen {
            debug!("[AUTH] Refresh already completed by a concurrent caller");
            return true;
        }

        match self.exchange().await {
            Ok(()) => true,
            Err(e) => {
                warn!("[AUTH] Access token refresh failed: {}", e);
                false
            }
        }
    }

    async fn exchange(&self) -> Result<()> {
        let current = self.store.get().await;

        let response = self
            .http
            .post(&self.refresh_url)
            .headers(browser_headers())
            .header(COOKIE, format!("{}={}", REFRESH_COOKIE, current.refresh_token))
            .send()
            .await?;

        let status = response.status();
        debug!("[AUTH] Refresh response status: {}", status);

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!("[AUTH] Refresh response body: {}", truncate(&body, 500));
            return Err(AppError::Unauthorized(format!("refresh endpoint returned {}", status)));
        }

        let set_cookies: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        let access = cookie_value(&set_cookies, ACCESS_COOKIE).ok_or_else(|| {
            AppError::Unauthorized(format!("no {} cookie in refresh response", ACCESS_COOKIE))
        })?;
        let refresh = cookie_value(&set_cookies, REFRESH_COOKIE).unwrap_or(current.refresh_token);

        let pair = self.store.set(refresh, access, self.ttl).await;
        info!("[AUTH] Access token refreshed, valid until {}", format_time(pair.expires_at));

        Ok(())
    }
}

/// Find `name=value` among `Set-Cookie` header values; the value ends at the first `;`.
pub fn cookie_value(set_cookies: &[&str], name: &str) -> Option<String> {
    let needle = format!("{}=", name);

    set_cookies.iter().find_map(|cookie| {
        let start = cookie.find(&needle)? + needle.len();
        let value = cookie[start..].split(';').next()?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

pub(crate) fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

// region: --- Scheduler
/// Background task keeping the access credential ahead of its expiry.
pub struct RefreshScheduler {
    refresher: Arc<CredentialRefresher>,
    interval: Duration,
    threshold: Duration,
}

impl RefreshScheduler {
    pub fn new(refresher: Arc<CredentialRefresher>, interval: Duration, threshold: Duration) -> Self {
        Self {
            refresher,
            interval,
            threshold,
        }
    }

    /// One scheduler wake-up: refresh if the access credential expires within the threshold.
    ///
    /// Returns whether a refresh was attempted.
    pub async fn tick(&self) -> bool {
        let left = self.refresher.store().expires_in().await;
        let threshold = chrono::Duration::from_std(self.threshold).unwrap_or(chrono::Duration::MAX);

        if left > threshold {
            debug!("[AUTH] Access token valid for {}s, no refresh needed", left.num_seconds());
            return false;
        }

        info!("[AUTH] Access token expires in {}s, refreshing", left.num_seconds());
        if !self.refresher.refresh().await {
            error!("[AUTH] Scheduled refresh failed, will retry next tick");
        }
        true
    }

    /// Spawn the scheduler for the rest of the process lifetime.
    ///
    /// Performs one unconditional refresh first, then ticks every `interval`.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("[AUTH] Performing initial token refresh on startup...");
            if !self.refresher.refresh().await {
                warn!("[AUTH] Initial refresh failed, continuing with seed credentials");
            }

            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}
// endregion: --- Scheduler

// endregion: --- Tests

//! # Market Feed Client
//!
//! Reads the Axiom trending feed (`GET {api_base}/meme-trending?timePeriod=1h`)
//! and picks out a single token.
//!
//! Failure never escapes [`MarketFeedClient::fetch_trending`]: every path ends in
//! `None`, meaning "market data unavailable".
//!
//! | Outcome of an attempt | Action |
//! |---|---|
//! | 401 / 403 / 434 | refresh; retry if the refresh worked and attempts remain |
//! | other non-200 | give up |
//! | 200 with unparsable body, transport error | refresh and retry if attempts remain |
//! | 200 parsed | linear scan for `tokenAddress` |
//!
//! Only the matching entry is decoded into [`RawMarketData`]; malformed sibling
//! entries are ignored. A matching entry that does not decode is `None` with no
//! refresh.

use super::auth::{truncate, CredentialRefresher};
use super::credentials::CredentialPair;
use super::types::RawMarketData;
use super::{browser_headers, trim_base};
use crate::retry::RetryPolicy;
use lib_core::config::DEFAULT_AXIOM_API_URL;
use lib_core::{AppError, Result};
use reqwest::header::COOKIE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Builder for configuring [`MarketFeedClient`].
#[derive(Debug, Clone)]
pub struct MarketFeedClientBuilder {
    timeout: Duration,
    api_base: String,
    time_period: String,
    retry: RetryPolicy,
}

impl Default for MarketFeedClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            api_base: DEFAULT_AXIOM_API_URL.to_string(),
            time_period: "1h".to_string(),
            retry: RetryPolicy::market_feed(),
        }
    }
}

impl MarketFeedClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API base URL.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Set the rolling window of the trending feed ("5m", "1h", "24h", ...).
    pub fn time_period(mut self, period: impl Into<String>) -> Self {
        self.time_period = period.into();
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the client; authentication goes through `refresher` and its store.
    pub fn build(self, refresher: Arc<CredentialRefresher>) -> Result<MarketFeedClient> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(MarketFeedClient {
            http,
            trending_url: format!("{}/meme-trending", trim_base(&self.api_base)),
            time_period: self.time_period,
            refresher,
            retry: self.retry,
        })
    }
}

/// Authenticated client for the Axiom trending feed.
pub struct MarketFeedClient {
    http: Client,
    trending_url: String,
    time_period: String,
    refresher: Arc<CredentialRefresher>,
    retry: RetryPolicy,
}

/// Outcome of a single request.
enum Attempt {
    Feed(Vec<Value>),
    AuthRejected(u16),
    Rejected(u16),
    Garbled(AppError),
}

impl MarketFeedClient {
    pub fn builder() -> MarketFeedClientBuilder {
        MarketFeedClientBuilder::default()
    }

    /// Trending entry for `token_address`, or `None` when it is not trending or
    /// the feed is unavailable.
    #[instrument(skip(self))]
    pub async fn fetch_trending(&self, token_address: &str) -> Option<RawMarketData> {
        let mut attempt = 0;

        loop {
            let credentials = self.refresher.store().get().await;

            match self.request_once(&credentials).await {
                Attempt::Feed(items) => return find_entry(items, token_address),
                Attempt::AuthRejected(status) => {
                    info!("[AXIOM] Received {}, attempting token refresh...", status);
                    if !self.refresher.refresh().await {
                        error!("[AXIOM] Token refresh failed, cannot fetch market data");
                        return None;
                    }
                    if !self.retry.has_attempts_left(attempt) {
                        warn!("[AXIOM] Max retries reached after {} attempts", attempt + 1);
                        return None;
                    }
                }
                Attempt::Rejected(status) => {
                    error!("[AXIOM] Trending feed returned status {}", status);
                    return None;
                }
                Attempt::Garbled(e) => {
                    warn!("[AXIOM] Trending feed unusable: {}", e);
                    if !self.retry.has_attempts_left(attempt) {
                        return None;
                    }
                    info!("[AXIOM] Attempting token refresh before retry...");
                    if !self.refresher.refresh().await {
                        return None;
                    }
                }
            }

            self.retry.pause(attempt).await;
            attempt += 1;
        }
    }

    async fn request_once(&self, credentials: &CredentialPair) -> Attempt {
        let response = match self
            .http
            .get(&self.trending_url)
            .query(&[("timePeriod", self.time_period.as_str())])
            .headers(browser_headers())
            .header(COOKIE, credentials.cookie_header())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Garbled(e.into()),
        };

        let status = response.status().as_u16();
        debug!("[AXIOM] Trending feed response status: {}", status);

        if self.retry.is_retryable_status(status) {
            return Attempt::AuthRejected(status);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Garbled(e.into()),
        };

        if status != 200 {
            debug!("[AXIOM] Raw response: {}...", truncate(&body, 500));
            return Attempt::Rejected(status);
        }

        match serde_json::from_str::<Vec<Value>>(&body) {
            Ok(items) => {
                debug!("[AXIOM] Trending feed returned {} tokens", items.len());
                Attempt::Feed(items)
            }
            Err(e) => {
                debug!("[AXIOM] Raw response: {}...", truncate(&body, 500));
                Attempt::Garbled(e.into())
            }
        }
    }
}

/// Linear scan on `tokenAddress`, decoding only the match.
fn find_entry(items: Vec<Value>, token_address: &str) -> Option<RawMarketData> {
    let Some(entry) = items
        .into_iter()
        .find(|item| item.get("tokenAddress").and_then(Value::as_str) == Some(token_address))
    else {
        debug!("[AXIOM] {} is not in the trending feed", token_address);
        return None;
    };

    match serde_json::from_value::<RawMarketData>(entry) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!("[AXIOM] Trending entry for {} has unexpected shape: {}", token_address, e);
            None
        }
    }
}

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::CredentialStore;
    use crate::test_support::{market_item, MockUpstream, Scripted};
    use serde_json::json;

    const MINT: &str = "DoGE1111111111111111111111111111111111111111";

    fn client(mock: &MockUpstream) -> (MarketFeedClient, Arc<CredentialStore>) {
        let store = Arc::new(CredentialStore::new("r0", "a0", Duration::from_secs(900)));
        let refresher = Arc::new(
            CredentialRefresher::new(Arc::clone(&store), &mock.base_url, Duration::from_secs(900), Duration::from_secs(5))
                .unwrap(),
        );
        let client = MarketFeedClient::builder()
            .api_base(mock.base_url.clone())
            .timeout(Duration::from_secs(5))
            .build(refresher)
            .unwrap();
        (client, store)
    }

    fn refresh_ok(access: &str) -> Scripted {
        Scripted::json(200, json!({})).with_cookie(&format!("auth-access-token={}; Path=/", access))
    }

    #[tokio::test]
    async fn test_finds_token_in_feed() {
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::json(
            200,
            json!([market_item("Other111", "Other", "OTH"), market_item(MINT, "Dogecoin", "DOGE")]),
        ));
        let (client, _) = client(&mock);

        let item = client.fetch_trending(MINT).await.unwrap();
        assert_eq!(item.token_ticker.as_deref(), Some("DOGE"));
        assert_eq!(mock.trending.hits(), 1);
        assert_eq!(mock.refresh.hits(), 0);
        assert_eq!(mock.trending.queries(), vec!["timePeriod=1h".to_string()]);
        assert_eq!(
            mock.trending.cookies(),
            vec!["auth-refresh-token=r0; auth-access-token=a0".to_string()]
        );
    }

    #[tokio::test]
    async fn test_not_trending_is_none_without_retry() {
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::json(200, json!([market_item("Other111", "Other", "OTH")])));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 1);
    }

    #[tokio::test]
    async fn test_401_then_200_uses_retry_data_after_one_refresh() {
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::raw(401, "unauthorized"));
        mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Dogecoin", "DOGE")])));
        mock.refresh.push(refresh_ok("a1"));
        let (client, store) = client(&mock);

        let item = client.fetch_trending(MINT).await.unwrap();
        assert_eq!(item, serde_json::from_value::<RawMarketData>(market_item(MINT, "Dogecoin", "DOGE")).unwrap());
        assert_eq!(mock.refresh.hits(), 1);
        assert_eq!(mock.trending.hits(), 2);
        // The retry carried the new access cookie.
        assert_eq!(
            mock.trending.cookies()[1],
            "auth-refresh-token=r0; auth-access-token=a1".to_string()
        );
        assert_eq!(store.get().await.access_token, "a1");
    }

    #[tokio::test]
    async fn test_status_434_is_treated_as_auth_rejection() {
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::raw(434, ""));
        mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Dogecoin", "DOGE")])));
        mock.refresh.push(refresh_ok("a1"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_some());
        assert_eq!(mock.refresh.hits(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_none() {
        let mock = MockUpstream::start().await;
        mock.trending.always(Scripted::raw(403, "forbidden"));
        mock.refresh.always(refresh_ok("a1"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_aborts() {
        let mock = MockUpstream::start().await;
        mock.trending.always(Scripted::raw(401, ""));
        mock.refresh.always(Scripted::raw(500, "down"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 1);
        assert_eq!(mock.refresh.hits(), 1);
    }

    #[tokio::test]
    async fn test_other_status_gives_up_immediately() {
        let mock = MockUpstream::start().await;
        mock.trending.always(Scripted::raw(500, "boom"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 1);
        assert_eq!(mock.refresh.hits(), 0);
    }

    #[tokio::test]
    async fn test_garbled_body_refreshes_and_retries() {
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::raw(200, "<html>cloudflare</html>"));
        mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Dogecoin", "DOGE")])));
        mock.refresh.push(refresh_ok("a1"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_some());
        assert_eq!(mock.refresh.hits(), 1);
        assert_eq!(mock.trending.hits(), 2);
    }

    #[tokio::test]
    async fn test_garbled_body_on_last_attempt_is_none() {
        let mock = MockUpstream::start().await;
        mock.trending.always(Scripted::raw(200, "not json"));
        mock.refresh.always(refresh_ok("a1"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 2);
        // Only the first garbled attempt refreshes; the last one has nothing to retry.
        assert_eq!(mock.refresh.hits(), 1);
    }

    #[tokio::test]
    async fn test_malformed_sibling_entry_is_ignored() {
        let mut other = market_item("Other111", "Other", "OTH");
        other["buyCount"] = json!({"unexpected": true});
        other["tokenName"] = json!(42);
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::json(200, json!([other, market_item(MINT, "Dogecoin", "DOGE")])));
        let (client, _) = client(&mock);

        let item = client.fetch_trending(MINT).await.unwrap();

        assert_eq!(item.token_name.as_deref(), Some("Dogecoin"));
        assert_eq!(mock.trending.hits(), 1);
        assert_eq!(mock.refresh.hits(), 0);
    }

    #[tokio::test]
    async fn test_malformed_matching_entry_is_none_without_refresh() {
        let mut target = market_item(MINT, "Dogecoin", "DOGE");
        target["marketCapSol"] = json!("lots");
        let mock = MockUpstream::start().await;
        mock.trending.push(Scripted::json(200, json!([target])));
        mock.refresh.always(refresh_ok("a1"));
        let (client, _) = client(&mock);

        assert!(client.fetch_trending(MINT).await.is_none());
        assert_eq!(mock.trending.hits(), 1);
        assert_eq!(mock.refresh.hits(), 0);
    }
}
// endregion: --- Tests

//! # Axiom Trading API
//!
//! Cookie-authenticated access to the Axiom trading-analytics API.
//!
//! ```text
//! CredentialStore ◄── CredentialRefresher ◄── RefreshScheduler (background, 30s tick)
//!        ▲                    ▲
//!        └──── MarketFeedClient (refresh + retry on 401/403/434)
//! ```
//!
//! Axiom expects browser-looking requests; every call carries the header set from
//! [`browser_headers`].

// region: --- Modules
pub mod auth;
pub mod client;
pub mod credentials;
pub mod types;
// endregion: --- Modules

pub use auth::{CredentialRefresher, RefreshScheduler};
pub use client::{MarketFeedClient, MarketFeedClientBuilder};
pub use credentials::{CredentialPair, CredentialStore};
pub use types::RawMarketData;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};

pub const AXIOM_ORIGIN: &str = "https://axiom.trade";
pub const AXIOM_REFERER: &str = "https://axiom.trade/";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Headers shared by every Axiom request (cookies excluded).
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ORIGIN, HeaderValue::from_static(AXIOM_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(AXIOM_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers
}

/// Trim a trailing slash so paths can be appended with `format!("{}/path", base)`.
pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

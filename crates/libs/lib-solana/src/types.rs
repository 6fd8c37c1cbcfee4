//! # Token Record Types
//!
//! The normalized output of the aggregator, shaped for the chat frontend and the
//! `get_token_details` tool.
//!
//! ## Wire Format
//!
//! On-chain fields use snake_case (`token_address`, `total_supply`, ...), market
//! fields keep Axiom's camelCase (`marketCapSol`, `buyCount`, ...), and social
//! links are flattened into the top level:
//!
//! ```json
//! {
//!   "token_address": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
//!   "name": "Bonk",
//!   "symbol": "BONK",
//!   "description": "N/A",
//!   "holders": 20,
//!   "total_supply": 88000000000.0,
//!   "top_holders_percentage": 31.42,
//!   "tokenImage": "",
//!   "marketCapSol": 0.0,
//!   "marketCapPercentChange": 0.0,
//!   "liquiditySol": 0.0,
//!   "liquidityToken": 0.0,
//!   "volumeSol": 0.0,
//!   "buyCount": 0,
//!   "sellCount": 0,
//!   "website": "",
//!   "twitter": "",
//!   "telegram": "",
//!   "discord": ""
//! }
//! ```
//!
//! Every field is always present; `error` appears only when no source answered.

use crate::axiom::RawMarketData;
use serde::{Deserialize, Serialize};

/// Placeholder for an unknown name or symbol.
pub const UNKNOWN: &str = "UNKNOWN";
/// Placeholder for a missing description.
pub const NOT_AVAILABLE: &str = "N/A";
/// Error attached when neither source produced data.
pub const FETCH_FAILED: &str = "Failed to fetch token details";

/// Project links published on the trading platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub website: String,
    pub twitter: String,
    pub telegram: String,
    pub discord: String,
}

/// Merged view of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_address: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// Number of largest-holder accounts the RPC returned
    pub holders: u64,
    /// Decimal-adjusted supply
    pub total_supply: f64,
    /// Share of supply held by the largest holders, 0-100, two decimals
    pub top_holders_percentage: f64,
    #[serde(rename = "tokenImage")]
    pub token_image: String,
    #[serde(rename = "marketCapSol")]
    pub market_cap_sol: f64,
    /// Market cap change over the feed window (1h by default)
    #[serde(rename = "marketCapPercentChange")]
    pub market_cap_percent_change: f64,
    #[serde(rename = "liquiditySol")]
    pub liquidity_sol: f64,
    #[serde(rename = "liquidityToken")]
    pub liquidity_token: f64,
    #[serde(rename = "volumeSol")]
    pub volume_sol: f64,
    #[serde(rename = "buyCount")]
    pub buy_count: u64,
    #[serde(rename = "sellCount")]
    pub sell_count: u64,
    #[serde(flatten)]
    pub social: SocialLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TokenRecord {
    /// Record with every field at its default.
    pub fn empty(token_address: impl Into<String>) -> Self {
        Self {
            token_address: token_address.into(),
            name: UNKNOWN.to_string(),
            symbol: UNKNOWN.to_string(),
            description: NOT_AVAILABLE.to_string(),
            holders: 0,
            total_supply: 0.0,
            top_holders_percentage: 0.0,
            token_image: String::new(),
            market_cap_sol: 0.0,
            market_cap_percent_change: 0.0,
            liquidity_sol: 0.0,
            liquidity_token: 0.0,
            volume_sol: 0.0,
            buy_count: 0,
            sell_count: 0,
            social: SocialLinks::default(),
            error: None,
        }
    }

    /// Defaults plus the error flag: neither source produced data.
    pub fn failed(token_address: impl Into<String>) -> Self {
        Self {
            error: Some(FETCH_FAILED.to_string()),
            ..Self::empty(token_address)
        }
    }

    /// Record built from market data alone.
    pub fn from_market(token_address: impl Into<String>, market: &RawMarketData) -> Self {
        let mut record = Self::empty(token_address);
        record.name = text_or(&market.token_name, UNKNOWN);
        record.symbol = text_or(&market.token_ticker, UNKNOWN);
        record.total_supply = market.supply.unwrap_or(0.0);
        record.top_holders_percentage = market.top10_holders.unwrap_or(0.0);
        record.apply_market_fields(market);
        record
    }

    /// Copy the market-only fields (price action, liquidity, links, image).
    pub fn apply_market_fields(&mut self, market: &RawMarketData) {
        self.token_image = text_or(&market.token_image, "");
        self.market_cap_sol = market.market_cap_sol.unwrap_or(0.0);
        self.market_cap_percent_change = market.market_cap_percent_change.unwrap_or(0.0);
        self.liquidity_sol = market.liquidity_sol.unwrap_or(0.0);
        self.liquidity_token = market.liquidity_token.unwrap_or(0.0);
        self.volume_sol = market.volume_sol.unwrap_or(0.0);
        self.buy_count = market.buy_count.unwrap_or(0);
        self.sell_count = market.sell_count.unwrap_or(0);
        self.social = SocialLinks {
            website: text_or(&market.website, ""),
            twitter: text_or(&market.twitter, ""),
            telegram: text_or(&market.telegram, ""),
            discord: text_or(&market.discord, ""),
        };
    }
}

pub(crate) fn text_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: [&str; 19] = [
        "token_address", "name", "symbol", "description", "holders", "total_supply",
        "top_holders_percentage", "tokenImage", "marketCapSol", "marketCapPercentChange",
        "liquiditySol", "liquidityToken", "volumeSol", "buyCount", "sellCount",
        "website", "twitter", "telegram", "discord",
    ];

    #[test]
    fn test_empty_record_serializes_every_field() {
        let value = serde_json::to_value(TokenRecord::empty("Mint111")).unwrap();
        let object = value.as_object().unwrap();
        for field in FIELDS {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert!(!object.contains_key("error"));
        assert_eq!(object.len(), FIELDS.len());
    }

    #[test]
    fn test_failed_record_has_error_and_defaults() {
        let record = TokenRecord::failed("Mint111");
        assert_eq!(record.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(record.name, UNKNOWN);
        assert_eq!(record.symbol, UNKNOWN);
        assert_eq!(record.description, NOT_AVAILABLE);
        assert_eq!(record.holders, 0);
        assert_eq!(record.total_supply, 0.0);
        assert_eq!(record.buy_count, 0);
        assert_eq!(record.social, SocialLinks::default());
    }

    #[test]
    fn test_from_market_fills_defaults_for_missing_fields() {
        let market = RawMarketData {
            token_name: Some("Dogecoin".to_string()),
            token_ticker: Some("  ".to_string()),
            supply: Some(1_000_000.0),
            buy_count: Some(5),
            twitter: Some("https://x.com/doge".to_string()),
            ..Default::default()
        };

        let record = TokenRecord::from_market("Mint111", &market);
        assert_eq!(record.name, "Dogecoin");
        assert_eq!(record.symbol, UNKNOWN);
        assert_eq!(record.description, NOT_AVAILABLE);
        assert_eq!(record.total_supply, 1_000_000.0);
        assert_eq!(record.top_holders_percentage, 0.0);
        assert_eq!(record.buy_count, 5);
        assert_eq!(record.social.twitter, "https://x.com/doge");
        assert_eq!(record.social.website, "");
        assert!(record.error.is_none());
    }
}

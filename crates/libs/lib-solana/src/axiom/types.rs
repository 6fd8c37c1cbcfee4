//! # Axiom API Types
//!
//! Entries of the `/meme-trending` feed. Axiom adds and drops fields freely, so
//! every field is optional and unknown ones are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// One token of the trending feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMarketData {
    pub token_address: Option<String>,
    pub token_name: Option<String>,
    pub token_ticker: Option<String>,
    pub token_image: Option<String>,
    /// Already decimal-adjusted
    pub supply: Option<f64>,
    /// Percentage of supply held by the ten largest holders
    pub top10_holders: Option<f64>,
    pub market_cap_sol: Option<f64>,
    pub market_cap_percent_change: Option<f64>,
    pub liquidity_sol: Option<f64>,
    pub liquidity_token: Option<f64>,
    pub volume_sol: Option<f64>,
    #[serde(deserialize_with = "lenient_count")]
    pub buy_count: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub sell_count: Option<u64>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
}

/// Counts occasionally arrive as floats (`12.0`) or negative noise; accept any number.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.and_then(|n| {
        n.as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_feed_entry_with_nulls_and_extras() {
        let json = r#"{
            "tokenAddress": "Mint111",
            "tokenName": "Dogecoin",
            "tokenTicker": "DOGE",
            "tokenImage": null,
            "supply": 1000000000,
            "top10Holders": 18.5,
            "marketCapSol": 420.5,
            "buyCount": 12.0,
            "sellCount": 7,
            "twitter": "https://x.com/doge",
            "lpBurned": 100,
            "protocol": "Pump V1"
        }"#;

        let item: RawMarketData = serde_json::from_str(json).unwrap();
        assert_eq!(item.token_address.as_deref(), Some("Mint111"));
        assert_eq!(item.token_ticker.as_deref(), Some("DOGE"));
        assert_eq!(item.token_image, None);
        assert_eq!(item.supply, Some(1_000_000_000.0));
        assert_eq!(item.top10_holders, Some(18.5));
        assert_eq!(item.buy_count, Some(12));
        assert_eq!(item.sell_count, Some(7));
        assert_eq!(item.liquidity_sol, None);
    }
}

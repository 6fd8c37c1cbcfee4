//! # Token Aggregator
//!
//! Merges the Helius on-chain view and the Axiom trending entry of a token into
//! one [`TokenRecord`].
//!
//! ## Precedence
//!
//! - Helius owns name, symbol, description, holder count, supply and top-holder
//!   concentration.
//! - Axiom fills in name/symbol when Helius reports `UNKNOWN`, and supply or
//!   concentration when Helius computed exactly zero. A non-zero Helius value is
//!   never overridden, however stale it may be.
//! - Market cap, liquidity, volume, trade counts, image and links only come from Axiom.
//!
//! ## Degradation
//!
//! The on-chain side is usable only when both the asset and the holder lookups
//! returned data. Every source error or deadline overrun is logged and treated as
//! "no data"; the record is always returned, with `error` set when neither side
//! produced anything.

use crate::axiom::{MarketFeedClient, RawMarketData};
use crate::helius::{AssetLookupClient, RawAssetData, RawHolderData};
use crate::types::{text_or, TokenRecord, NOT_AVAILABLE, UNKNOWN};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Number of largest holders counted towards concentration.
pub const TOP_HOLDERS: usize = 5;

pub struct TokenAggregator {
    assets: Arc<AssetLookupClient>,
    market: Arc<MarketFeedClient>,
    source_deadline: Duration,
}

impl TokenAggregator {
    pub fn new(assets: Arc<AssetLookupClient>, market: Arc<MarketFeedClient>, source_deadline: Duration) -> Self {
        Self {
            assets,
            market,
            source_deadline,
        }
    }

    /// Details for `token_address`. Never fails; see the module docs for degradation.
    #[instrument(skip(self))]
    pub async fn get_token_details(&self, token_address: &str) -> TokenRecord {
        let deadline = self.source_deadline;

        let (asset, holders, market) = tokio::join!(
            within(deadline, "getAsset", async {
                self.assets.fetch_asset(token_address).await.map(Some)
            }),
            within(deadline, "getTokenLargestAccounts", async {
                self.assets.fetch_largest_holders(token_address).await.map(Some)
            }),
            within(deadline, "trending feed", async {
                Ok::<_, lib_core::AppError>(self.market.fetch_trending(token_address).await)
            }),
        );

        let on_chain = match (asset, holders) {
            (Some(asset), Some(holders)) if !asset.is_empty() && !holders.is_empty() => Some((asset, holders)),
            _ => None,
        };

        let record = merge(token_address, on_chain.as_ref().map(|(a, h)| (a, h)), market.as_ref());
        info!(
            "[TOKEN] {} -> name={} symbol={} holders={} on_chain={} market={}",
            token_address,
            record.name,
            record.symbol,
            record.holders,
            on_chain.is_some(),
            market.is_some()
        );
        record
    }
}

/// Run one source under `deadline`; errors and overruns become `None`.
async fn within<T, F>(deadline: Duration, source: &str, fut: F) -> Option<T>
where
    F: Future<Output = lib_core::Result<Option<T>>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!("[TOKEN] {} unusable: {}", source, e);
            None
        }
        Err(_) => {
            warn!("[TOKEN] {} exceeded {}s deadline", source, deadline.as_secs_f64());
            None
        }
    }
}

/// Merge whatever the sources produced.
pub fn merge(
    token_address: &str,
    on_chain: Option<(&RawAssetData, &RawHolderData)>,
    market: Option<&RawMarketData>,
) -> TokenRecord {
    let Some((asset, holders)) = on_chain else {
        return match market {
            Some(market) => TokenRecord::from_market(token_address, market),
            None => TokenRecord::failed(token_address),
        };
    };

    let accounts = holders.accounts();
    let total_supply = normalized_supply(asset.raw_supply(), asset.decimals());
    let top_amount: f64 = accounts
        .iter()
        .take(TOP_HOLDERS)
        .map(|h| h.ui_amount.unwrap_or(0.0))
        .sum();

    let mut record = TokenRecord::empty(token_address);
    record.name = asset.name().unwrap_or(UNKNOWN).to_string();
    record.symbol = asset.symbol().unwrap_or(UNKNOWN).to_string();
    record.description = asset.description().unwrap_or(NOT_AVAILABLE).to_string();
    record.holders = accounts.len() as u64;
    record.total_supply = total_supply;
    record.top_holders_percentage = concentration(top_amount, total_supply);

    if let Some(market) = market {
        if record.name == UNKNOWN {
            record.name = text_or(&market.token_name, UNKNOWN);
        }
        if record.symbol == UNKNOWN {
            record.symbol = text_or(&market.token_ticker, UNKNOWN);
        }
        if record.total_supply == 0.0 {
            record.total_supply = market.supply.unwrap_or(0.0);
        }
        if record.top_holders_percentage == 0.0 {
            record.top_holders_percentage = market.top10_holders.unwrap_or(0.0);
        }
        record.apply_market_fields(market);
    }

    record
}

/// Raw base-unit supply divided by `10^decimals`.
pub fn normalized_supply(raw_supply: f64, decimals: u32) -> f64 {
    if raw_supply <= 0.0 {
        return 0.0;
    }
    raw_supply / 10f64.powi(decimals as i32)
}

/// `top_amount / total_supply * 100`, rounded to two decimals; 0 for a zero supply.
pub fn concentration(top_amount: f64, total_supply: f64) -> f64 {
    if total_supply <= 0.0 {
        return 0.0;
    }
    round2(top_amount / total_supply * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// endregion: --- Tests

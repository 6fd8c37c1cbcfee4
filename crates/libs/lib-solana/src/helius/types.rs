//! # Helius RPC Types
//!
//! JSON-RPC envelope plus the parts of `getAsset` and `getTokenLargestAccounts`
//! results the aggregator reads. Missing fields fall back to defaults; an absent
//! `result` becomes an empty value.

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
pub struct RpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> RpcRequest<P> {
    pub fn new(id: &'static str, method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

// region: --- getAsset
/// `getAsset` result (DAS API).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawAssetData {
    pub id: Option<String>,
    pub content: Option<AssetContent>,
    pub token_info: Option<AssetTokenInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetContent {
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetTokenInfo {
    /// Raw supply in base units
    pub supply: Option<f64>,
    pub decimals: Option<u32>,
    pub price_info: Option<PriceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceInfo {
    pub price_per_token: Option<f64>,
    pub currency: Option<String>,
}

impl RawAssetData {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.content.is_none() && self.token_info.is_none()
    }

    fn metadata(&self) -> Option<&AssetMetadata> {
        self.content.as_ref()?.metadata.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        non_blank(self.metadata()?.name.as_deref())
    }

    pub fn symbol(&self) -> Option<&str> {
        non_blank(self.metadata()?.symbol.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_blank(self.metadata()?.description.as_deref())
    }

    pub fn raw_supply(&self) -> f64 {
        self.token_info.as_ref().and_then(|t| t.supply).unwrap_or(0.0)
    }

    pub fn decimals(&self) -> u32 {
        self.token_info.as_ref().and_then(|t| t.decimals).unwrap_or(0)
    }

    pub fn price_per_token(&self) -> Option<f64> {
        self.token_info.as_ref()?.price_info.as_ref()?.price_per_token
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
// endregion: --- getAsset

// region: --- getTokenLargestAccounts
/// `getTokenLargestAccounts` result, largest first as returned by the node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawHolderData {
    pub value: Option<Vec<HolderAccount>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HolderAccount {
    pub address: String,
    /// Raw amount in base units, as a string
    pub amount: String,
    pub decimals: u32,
    pub ui_amount: Option<f64>,
}

impl RawHolderData {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn accounts(&self) -> &[HolderAccount] {
        self.value.as_deref().unwrap_or(&[])
    }
}
// endregion: --- getTokenLargestAccounts

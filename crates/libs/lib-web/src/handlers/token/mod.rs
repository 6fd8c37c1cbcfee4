//! # Token Handlers
//!
//! ## Endpoints
//!
//! - `POST /api/token/details` - Aggregated details for a mint
//! - `GET /api/token/{address}` - Same, address in the path
//! - `GET /api/token/{address}/chart` - Price history (currently an empty series)
//!
//! ## Request Examples
//!
//! ```bash
//! curl -X POST http://localhost:3001/api/token/details \
//!   -H 'content-type: application/json' \
//!   -d '{"token_address":"DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"}'
//!
//! curl http://localhost:3001/api/token/DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263
//! ```

use crate::services::TokenService;
use axum::{
    extract::{Path, State},
    Json,
};
use lib_core::dto::{ChartData, TokenDetailsRequest};
use lib_core::AppError;
use lib_solana::{SolanaState, TokenRecord};
use std::sync::Arc;
use tracing::{info, instrument};

/// Aggregated token details.
///
/// **Route**: `POST /api/token/details`
///
/// # Returns
///
/// Success (200): `Json<TokenRecord>`. When neither source answered, the record
/// carries defaults and an `error` field.
///
/// Error (400): Malformed token address
#[instrument(skip(solana, req), fields(token_address = %req.token_address))]
pub async fn post_token_details(
    State(solana): State<Arc<SolanaState>>,
    Json(req): Json<TokenDetailsRequest>,
) -> Result<Json<TokenRecord>, AppError> {
    info!("[TOKEN] Details request");
    let record = TokenService::new(solana).get_token_details(&req.token_address).await?;
    Ok(Json(record))
}

/// **Route**: `GET /api/token/{address}`
#[instrument(skip(solana))]
pub async fn get_token_details(
    State(solana): State<Arc<SolanaState>>,
    Path(address): Path<String>,
) -> Result<Json<TokenRecord>, AppError> {
    let record = TokenService::new(solana).get_token_details(&address).await?;
    Ok(Json(record))
}

/// **Route**: `GET /api/token/{address}/chart`
#[instrument(skip(solana))]
pub async fn get_chart_data(
    State(solana): State<Arc<SolanaState>>,
    Path(address): Path<String>,
) -> Result<Json<ChartData>, AppError> {
    let chart = TokenService::new(solana).get_chart_data(&address).await?;
    Ok(Json(chart))
}

#[cfg(test)]
mod tests;

//! # Tool Handlers
//!
//! Function-calling endpoints. `GET /api/tools` lists the definitions a chat model
//! needs; `POST /api/tools/call` runs one.
//!
//! ```bash
//! curl -X POST http://localhost:3001/api/tools/call \
//!   -H 'content-type: application/json' \
//!   -d '{"name":"get_token_details","arguments":{"token_address":"DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"}}'
//! ```

use crate::services::tools::{tool_definitions, ToolService};
use axum::{extract::State, Json};
use lib_core::dto::ToolCallRequest;
use lib_core::AppError;
use lib_solana::SolanaState;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// **Route**: `GET /api/tools`
pub async fn list_tools() -> Json<Value> {
    Json(tool_definitions())
}

/// **Route**: `POST /api/tools/call`
///
/// Error (404): Unknown tool. Error (400): Missing or malformed `token_address`.
#[instrument(skip(solana, req), fields(tool = %req.name))]
pub async fn call_tool(
    State(solana): State<Arc<SolanaState>>,
    Json(req): Json<ToolCallRequest>,
) -> Result<Json<Value>, AppError> {
    let output = ToolService::new(solana).call(&req.name, req.arguments).await?;
    Ok(Json(output))
}

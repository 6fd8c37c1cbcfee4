//! # Tool Service
//!
//! Function-calling surface over the token operations. A chat model (or any other
//! caller) lists the tool definitions, then invokes a tool by name with JSON
//! arguments and gets the tool's JSON result back.
//!
//! Arguments may arrive either as a JSON object or as a JSON-encoded string, which
//! is how function-calling APIs usually hand them over.

use crate::services::TokenService;
use lib_core::{AppError, Result};
use lib_solana::SolanaState;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

pub const GET_TOKEN_DETAILS: &str = "get_token_details";
pub const GET_CHART_DATA: &str = "get_chart_data";

#[derive(Debug, Deserialize)]
struct AddressArgs {
    token_address: String,
}

/// Tool definitions in the function-calling schema.
pub fn tool_definitions() -> Value {
    json!([
        {
            "type": "function",
            "function": {
                "name": GET_TOKEN_DETAILS,
                "description": "Fetches detailed information about a Solana token, including name, symbol, \
                    description, holder count, total supply, top holders percentage, market cap, liquidity, \
                    volume, buy/sell counts and social media links.",
                "parameters": address_parameters("The address of the Solana token to fetch details for.")
            }
        },
        {
            "type": "function",
            "function": {
                "name": GET_CHART_DATA,
                "description": "Fetches chart data for a Solana token, such as price history.",
                "parameters": address_parameters("The address of the Solana token to fetch chart data for.")
            }
        }
    ])
}

fn address_parameters(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "token_address": {
                "type": "string",
                "description": description
            }
        },
        "required": ["token_address"]
    })
}

pub struct ToolService {
    tokens: TokenService,
}

impl ToolService {
    pub fn new(solana: Arc<SolanaState>) -> Self {
        Self {
            tokens: TokenService::new(solana),
        }
    }

    /// Run a tool by name.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - Unknown tool name
    /// * `AppError::InvalidInput` - Missing or malformed `token_address`
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        info!("[TOOLS] Executing {}", name);
        match name {
            GET_TOKEN_DETAILS => {
                let args = parse_args(arguments)?;
                let record = self.tokens.get_token_details(&args.token_address).await?;
                Ok(serde_json::to_value(record)?)
            }
            GET_CHART_DATA => {
                let args = parse_args(arguments)?;
                let chart = self.tokens.get_chart_data(&args.token_address).await?;
                Ok(serde_json::to_value(chart)?)
            }
            other => Err(AppError::NotFound(format!("Unknown tool: {}", other))),
        }
    }
}

fn parse_args(arguments: Value) -> Result<AddressArgs> {
    let arguments = match arguments {
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| AppError::InvalidInput(format!("Tool arguments are not valid JSON: {}", e)))?,
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|_| AppError::InvalidInput("token_address is required".to_string()))
}

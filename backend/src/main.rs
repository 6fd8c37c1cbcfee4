//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_utils::{get_env_opt, get_env_parse_or};
use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let host = get_env_opt("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = get_env_parse_or("PORT", 3001)?;

    let config = ServerConfig {
        bind_address: format!("{}:{}", host, port),
        ..Default::default()
    };

    start_server(config).await
}

//! # Web Library
//!
//! HTTP surface of the token intelligence service: handlers, services, middleware
//! and server setup.
//!
//! ## Endpoints
//!
//! ```bash
//! curl http://localhost:3001/api/token/DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263
//! curl http://localhost:3001/api/credentials/status
//! curl http://localhost:3001/api/tools
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use server::{start_server, AppState, ServerConfig};

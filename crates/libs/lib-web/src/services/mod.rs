//! # Services Layer
//!
//! Business logic between the HTTP handlers and the token core in `lib_solana`:
//!
//! ```text
//! Handlers (HTTP) → Services → SolanaState (aggregator, credentials)
//! ```
//!
//! - [`token`] - Token details, chart data, credential status
//! - [`tools`] - Function-calling tool definitions and dispatch
//!
//! All services return `Result<T, AppError>`.

pub mod token;
pub mod tools;

pub use token::TokenService;
pub use tools::ToolService;

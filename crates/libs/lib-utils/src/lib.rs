//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, and validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_opt, get_env_parse, get_env_parse_or};
pub use time::{now_utc, format_time};
pub use validation::{validate_not_empty, validate_solana_address};

//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies of the REST API. The token record itself lives in
//! `lib_solana::types` since the aggregator produces it.

pub mod token;

pub use token::*;

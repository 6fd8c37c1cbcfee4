//! # Solana Token Intelligence Library
//!
//! Token details for Solana mints, merged from two sources:
//!
//! - **Helius** (on-chain): asset metadata, supply, largest holders
//! - **Axiom** (market): trending feed with market cap, liquidity, volume, links
//!
//! Axiom access is cookie-authenticated; the [`axiom`] module keeps that session
//! alive. [`aggregator::TokenAggregator`] produces the final [`types::TokenRecord`].

pub mod aggregator;
pub mod axiom;
pub mod helius;
pub mod retry;
pub mod state;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

// Re-export commonly used types from root for convenience
pub use aggregator::TokenAggregator;
pub use retry::RetryPolicy;
pub use state::SolanaState;
pub use types::TokenRecord;

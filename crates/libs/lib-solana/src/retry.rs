//! # Retry Policy
//!
//! Bounded retry settings shared by the outbound clients: how many attempts a
//! call gets, how long to wait between them, and which HTTP statuses mean
//! "authorization rejected, refresh and try again".

use std::time::Duration;

/// Statuses Axiom answers with when the access cookie is stale or rejected.
/// 434 is non-standard but observed in practice.
pub const AUTH_REJECTED_STATUSES: [u16; 3] = [401, 403, 434];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included. Always at least 1.
    pub max_attempts: u32,
    /// Base delay before a retry; multiplied by the retry number. Zero disables waiting.
    pub backoff: Duration,
    /// Statuses that trigger a credential refresh followed by a retry.
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Market feed default: two attempts, no backoff, retry on auth rejection.
    pub fn market_feed() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::ZERO,
            retry_statuses: AUTH_REJECTED_STATUSES.to_vec(),
        }
    }

    /// One attempt, nothing retryable.
    pub fn single_shot() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
            retry_statuses: Vec::new(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Whether another attempt may follow the zero-based `attempt`.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Sleep before the attempt following `attempt`.
    pub async fn pause(&self, attempt: u32) {
        if !self.backoff.is_zero() {
            tokio::time::sleep(self.backoff * (attempt + 1)).await;
        }
    }
}

//! # Credential Store
//!
//! Holds the Axiom refresh/access cookie pair and the instant the access cookie
//! expires. Pair, expiry and write counter sit behind a single `RwLock`, so a
//! reader always sees one complete write: never a new access token next to an
//! old expiry.

use chrono::{DateTime, Utc};
use lib_utils::now_utc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Snapshot of the trading API credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub refresh_token: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialPair {
    /// Time left before `expires_at`, negative once expired.
    pub fn expires_in(&self) -> chrono::Duration {
        self.expires_at - now_utc()
    }

    /// `Cookie` header value carrying both tokens.
    pub fn cookie_header(&self) -> String {
        format!(
            "auth-refresh-token={}; auth-access-token={}",
            self.refresh_token, self.access_token
        )
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("refresh_token", &format_args!("<{} chars>", self.refresh_token.len()))
            .field("access_token", &format_args!("<{} chars>", self.access_token.len()))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

struct Slot {
    pair: CredentialPair,
    version: u64,
}

/// Process-lifetime holder of the current [`CredentialPair`].
///
/// Written only by `CredentialRefresher`; every authenticated call reads it.
pub struct CredentialStore {
    slot: RwLock<Slot>,
}

impl CredentialStore {
    /// Seed the store, stamping `now + ttl` as expiry.
    pub fn new(refresh_token: impl Into<String>, access_token: impl Into<String>, ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(Slot {
                pair: CredentialPair {
                    refresh_token: refresh_token.into(),
                    access_token: access_token.into(),
                    expires_at: expiry_after(ttl),
                },
                version: 0,
            }),
        }
    }

    /// Current pair.
    pub async fn get(&self) -> CredentialPair {
        self.slot.read().await.pair.clone()
    }

    /// Atomically replace the pair and stamp a fresh expiry.
    pub async fn set(
        &self,
        refresh_token: impl Into<String>,
        access_token: impl Into<String>,
        ttl: Duration,
    ) -> CredentialPair {
        let pair = CredentialPair {
            refresh_token: refresh_token.into(),
            access_token: access_token.into(),
            expires_at: expiry_after(ttl),
        };

        let mut slot = self.slot.write().await;
        slot.pair = pair.clone();
        slot.version += 1;
        debug!("[AUTH] Credential store updated (version {}), expires at {}", slot.version, pair.expires_at);

        pair
    }

    /// Time left before the access credential expires.
    pub async fn expires_in(&self) -> chrono::Duration {
        self.slot.read().await.pair.expires_in()
    }

    /// Number of writes since the store was seeded.
    pub async fn version(&self) -> u64 {
        self.slot.read().await.version
    }
}

fn expiry_after(ttl: Duration) -> DateTime<Utc> {
    // Out-of-range TTLs saturate instead of panicking.
    let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    now_utc().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_stamps_ttl() {
        let store = CredentialStore::new("r0", "a0", Duration::from_secs(900));
        let left = store.expires_in().await.num_seconds();
        assert!((895..=900).contains(&left), "unexpected ttl {}", left);
        assert_eq!(store.version().await, 0);
    }

    #[tokio::test]
    async fn test_set_replaces_whole_pair() {
        let store = CredentialStore::new("r0", "a0", Duration::from_secs(10));
        let written = store.set("r1", "a1", Duration::from_secs(900)).await;

        let read = store.get().await;
        assert_eq!(read, written);
        assert_eq!(read.cookie_header(), "auth-refresh-token=r1; auth-access-token=a1");
        assert_eq!(store.version().await, 1);
    }

    #[tokio::test]
    async fn test_debug_does_not_print_tokens() {
        let store = CredentialStore::new("very-secret-refresh", "very-secret-access", Duration::from_secs(900));
        let rendered = format!("{:?}", store.get().await);
        assert!(!rendered.contains("very-secret"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_never_see_torn_pairs() {
        // Each write i uses tokens ("r{i}", "a{i}") and a TTL of i seconds, so a reader can
        // check that both tokens and the expiry came from the same write.
        let store = Arc::new(CredentialStore::new("r0", "a0", Duration::from_secs(1000)));

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 1..=500u64 {
                    store
                        .set(format!("r{}", i), format!("a{}", i), Duration::from_secs(1000 + i * 100))
                        .await;
                    tokio::task::yield_now().await;
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            readers.push(tokio::spawn(async move {
                for _ in 0..500 {
                    let pair = store.get().await;
                    let r: u64 = pair.refresh_token[1..].parse().unwrap();
                    let a: u64 = pair.access_token[1..].parse().unwrap();
                    assert_eq!(r, a, "refresh and access tokens from different writes");

                    // 100s spacing between writes leaves plenty of slack for elapsed time.
                    let expected = 1000 + r as i64 * 100;
                    let left = pair.expires_in().num_seconds();
                    assert!((expected - 50..=expected).contains(&left), "expiry from a different write");
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
// endregion: --- Tests

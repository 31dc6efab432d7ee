//! Token cache contract and the in-process implementation
//!
//! The contract guarantees one cached value per key and at most one
//! generator run per key per miss. Backends shared across instances
//! implement [`CacheProvider`] themselves; [`MemoryTokenCache`] covers a
//! single process.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;

use crate::AuthError;

/// Token produced by a cache generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    /// Token value handed back to callers
    pub value: String,
    /// How long the backend should keep the value
    pub ttl: Duration,
    /// Instant after which the value must be regenerated
    pub expires_at: SystemTime,
}

impl StoredToken {
    /// Create a token that expires `ttl` from now
    pub fn expiring_in(value: String, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            expires_at: SystemTime::now() + ttl,
        }
    }

    fn is_fresh_at(&self, now: SystemTime) -> bool {
        self.expires_at > now
    }
}

/// Generator run on a cache miss
pub type TokenFuture<'a> = BoxFuture<'a, Result<StoredToken, AuthError>>;

/// Keyed token cache with single-flight generation
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Return the cached value for `key`, running `generate` on miss or expiry
    ///
    /// `generate` is only polled when no fresh value exists, and concurrent
    /// callers for the same key share one generator run.
    async fn get_and_store_token<'a>(&'a self, key: &'a str, generate: TokenFuture<'a>) -> Result<String, AuthError>;

    /// Drop every cached value, where the backend supports it
    fn clear(&self) {}
}

type Slot = Arc<Mutex<Option<StoredToken>>>;

/// In-process token cache
///
/// Each key owns an async mutex, so a miss is generated once while other
/// callers for the same key wait for the result.
#[derive(Default)]
pub struct MemoryTokenCache {
    slots: DashMap<String, Slot>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a slot (fresh or expired)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, key: &str) -> Slot {
        Arc::clone(&self.slots.entry(key.to_owned()).or_default())
    }
}

#[async_trait]
impl CacheProvider for MemoryTokenCache {
    async fn get_and_store_token<'a>(&'a self, key: &'a str, generate: TokenFuture<'a>) -> Result<String, AuthError> {
        let slot = self.slot(key);
        let mut cached = slot.lock().await;

        if let Some(token) = cached.as_ref()
            && token.is_fresh_at(SystemTime::now())
        {
            tracing::debug!(cache_key = key, "token cache hit");
            return Ok(token.value.clone());
        }

        tracing::debug!(cache_key = key, "token cache miss");
        let token = generate.await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    fn clear(&self) {
        self.slots.clear();
    }
}

impl std::fmt::Debug for MemoryTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenCache")
            .field("keys", &self.slots.len())
            .finish()
    }
}

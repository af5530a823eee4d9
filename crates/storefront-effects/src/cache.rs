//! In-memory session cache

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::effects::{CacheEffects, CacheError};
use storefront_core::StorefrontConfig;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory cache handler
///
/// With a TTL set, every write restarts the entry's expiry and reads of an
/// expired entry behave as if it was never written.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheHandler {
    data: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Option<Duration>,
}

impl MemoryCacheHandler {
    /// Create a cache whose entries never expire
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries expire `ttl` after their last write
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            data: Arc::default(),
            ttl: Some(ttl),
        }
    }

    /// Create a cache honouring `session_ttl_secs`
    pub fn from_config(config: &StorefrontConfig) -> Self {
        match config.session_ttl() {
            Some(ttl) => Self::with_ttl(ttl),
            None => Self::new(),
        }
    }

    /// Number of unexpired entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let data = self.data.read().await;
        data.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Whether the cache holds no unexpired entry
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, e| !e.is_expired(now));
        before - data.len()
    }
}

fn check_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey {
            reason: "Key cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl CacheEffects for MemoryCacheHandler {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        check_key(key)?;
        let now = Instant::now();
        {
            let data = self.data.read().await;
            match data.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        let mut data = self.data.write().await;
        if data.get(key).is_some_and(|e| e.is_expired(now)) {
            data.remove(key);
            tracing::debug!(key, "cache entry expired");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        check_key(key)?;
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        let mut data = self.data.write().await;
        data.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        check_key(key)?;
        let now = Instant::now();
        let mut data = self.data.write().await;
        Ok(data.remove(key).is_some_and(|e| !e.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = MemoryCacheHandler::new();
        cache.set("alice:basket", b"state".to_vec()).await.unwrap();
        assert_eq!(
            cache.get("alice:basket").await.unwrap(),
            Some(b"state".to_vec())
        );
        assert!(cache.remove("alice:basket").await.unwrap());
        assert!(!cache.remove("alice:basket").await.unwrap());
        assert_eq!(cache.get("alice:basket").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected() {
        let cache = MemoryCacheHandler::new();
        assert!(matches!(
            cache.set("", Vec::new()).await,
            Err(CacheError::InvalidKey { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_last_write() {
        let cache = MemoryCacheHandler::with_ttl(Duration::from_secs(60));
        cache.set("bob:product", vec![1]).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        cache.set("bob:product", vec![2]).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(cache.get("bob:product").await.unwrap(), Some(vec![2]));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get("bob:product").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCacheHandler::with_ttl(Duration::from_secs(1));
        cache.set("a", vec![1]).await.unwrap();
        cache.set("b", vec![2]).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.purge_expired().await, 2);
    }
}

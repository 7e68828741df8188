//! In-memory cache implementation backed by dashmap.
//!
//! The conditional operations (`set_nx`, `compare_and_delete`) go through
//! dashmap's sharded entry locks, so they are atomic with respect to
//! concurrent tasks in the same process. Cross-process coordination needs
//! the Redis provider.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use lockstep_core::config::cache::MemoryCacheConfig;
use lockstep_core::result::AppResult;
use lockstep_core::traits::cache::CacheProvider;

/// A stored value together with its expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache provider with per-entry TTLs.
///
/// Expired entries are treated as absent everywhere and evicted lazily;
/// a full sweep runs when the map grows past the configured capacity.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// Entries keyed by cache key.
    entries: Arc<DashMap<String, CacheEntry>>,
    /// Entry count that triggers an expired-entry sweep on insert.
    max_capacity: u64,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_capacity: config.max_capacity,
        }
    }

    fn sweep_expired(&self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        debug!(
            swept = before - self.entries.len(),
            "Swept expired cache entries"
        );
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        // The shard guard must be dropped before remove_if on the same key.
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
            None => return Ok(None),
        };
        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if self.entries.len() as u64 >= self.max_capacity {
            self.sweep_expired();
        }
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        // An expired entry counts as absent and is replaced in place.
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(CacheEntry::new(value, ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(value, ttl));
                Ok(true)
            }
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        let removed = self
            .entries
            .remove_if(key, |_, entry| {
                !entry.is_expired() && entry.value == expected
            })
            .is_some();
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        let val = provider.get("key2").await.unwrap();
        assert_eq!(val, None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let provider = make_provider();
        provider
            .set("short", "v", Duration::from_millis(30))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(provider.get("short").await.unwrap(), None);
        assert!(!provider.exists("short").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_nx() {
        let provider = make_provider();
        let first = provider
            .set_nx("nx_key", "val", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(first);
        let second = provider
            .set_nx("nx_key", "val2", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!second);
        assert_eq!(provider.get("nx_key").await.unwrap(), Some("val".to_string()));
    }

    #[tokio::test]
    async fn test_set_nx_replaces_expired_entry() {
        let provider = make_provider();
        provider
            .set_nx("nx_ttl", "old", Duration::from_millis(30))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        let reacquired = provider
            .set_nx("nx_ttl", "new", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(reacquired);
        assert_eq!(provider.get("nx_ttl").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_compare_and_delete() {
        let provider = make_provider();
        provider
            .set("cad", "owner-a", Duration::from_secs(60))
            .await
            .unwrap();

        let wrong = provider.compare_and_delete("cad", "owner-b").await.unwrap();
        assert!(!wrong);
        assert!(provider.exists("cad").await.unwrap());

        let right = provider.compare_and_delete("cad", "owner-a").await.unwrap();
        assert!(right);
        assert!(!provider.exists("cad").await.unwrap());
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"name": "test", "count": 42});
        provider
            .set_json("json_key", &data, Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}

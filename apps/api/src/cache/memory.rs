//! Bounded in-process cache store. Used when no Redis URL is configured.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use super::{glob_match, CacheError, CacheStore};

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with; an overwrite
/// restarts the clock.
struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// moka cache capped at `max_capacity` entries, with per-entry TTL.
pub struct MemoryCacheStore {
    entries: Cache<String, MemoryEntry>,
}

impl MemoryCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity.max(1))
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Entry count after pending evictions have been applied.
    pub async fn live_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_string(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, CacheError> {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| glob_match(pattern, key))
            .map(|(key, _)| String::clone(&key))
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.entries.remove(&key).await.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capacity_is_enforced() {
        let store = MemoryCacheStore::new(4);
        for i in 0..32 {
            let key = format!("k{i}");
            store.set(&key, "v", Duration::from_secs(60)).await.unwrap();
        }

        assert!(store.live_count().await <= 4);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = MemoryCacheStore::new(8);
        store.set("a", "1", Duration::from_secs(10)).await.unwrap();
        store.set("b", "2", Duration::from_secs(20)).await.unwrap();
        store.set("a", "updated", Duration::from_secs(10)).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("updated"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_entries_expire_after_their_own_ttl() {
        let store = MemoryCacheStore::new(8);
        store.set("short", "1", Duration::from_millis(50)).await.unwrap();
        store.set("long", "2", Duration::from_secs(60)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = MemoryCacheStore::new(8);
        store.set("a", "1", Duration::from_secs(60)).await.unwrap();

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_matching_counts_removed_keys() {
        let store = MemoryCacheStore::new(10);
        for key in ["careerkit:tool:1", "careerkit:tool:2", "careerkit:plan:1"] {
            store.set(key, "v", Duration::from_secs(60)).await.unwrap();
        }
        assert_eq!(store.delete_matching("careerkit:tool:*").await.unwrap(), 2);
        assert_eq!(store.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_matching_honours_character_classes() {
        let store = MemoryCacheStore::new(10);
        for key in ["tool:a", "tool:b", "tool:c"] {
            store.set(key, "v", Duration::from_secs(60)).await.unwrap();
        }
        assert_eq!(store.delete_matching("tool:[ab]").await.unwrap(), 2);
        assert_eq!(store.get("tool:c").await.unwrap().as_deref(), Some("v"));
    }
}

//! Response cache — best-effort memoization of expensive generations.
//!
//! `ResponseCache` is the only type handlers touch. It wraps an optional
//! injected `CacheStore`; with no store every call is a no-op, so callers
//! treat "cache disabled" and "cache miss" identically. Backend failures are
//! logged and degrade to a miss. There is no stampede protection: concurrent
//! misses on one key each recompute and overwrite.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

pub mod memory;
pub mod redis_store;

pub use memory::MemoryCacheStore;
pub use redis_store::RedisCacheStore;

/// Every key written by CareerKit starts with this, so the store can be shared.
pub const KEY_PREFIX: &str = "careerkit:";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A string key-value store with per-entry TTL.
///
/// Patterns use Redis glob syntax (`*`, `?`, `[...]`, `[^...]`, `\x`).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Returns whether a key was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Returns how many keys were removed.
    async fn delete_matching(&self, pattern: &str) -> Result<usize, CacheError>;
}

#[derive(Clone)]
pub struct ResponseCache {
    store: Option<Arc<dyn CacheStore>>,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self {
            store: Some(store),
            default_ttl,
        }
    }

    /// A cache with no backing store: every read misses, every write is dropped.
    pub fn disabled() -> Self {
        Self {
            store: None,
            default_ttl: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let key = namespaced(key);

        let raw = match store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, "Cache read failed, treating as miss: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, "Cached value did not deserialize, treating as miss: {e}");
                None
            }
        }
    }

    /// Stores `value` for `expiry_in_seconds`, or the configured default TTL.
    /// Returns `false` when the cache is disabled or the write failed.
    pub async fn set_in_cache<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expiry_in_seconds: Option<u64>,
    ) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        let key = namespaced(key);
        let ttl = expiry_in_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        let result = match serde_json::to_string(value) {
            Ok(raw) => store.set(&key, &raw, ttl).await,
            Err(e) => Err(CacheError::Serde(e)),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, "Cache write failed: {e}");
                false
            }
        }
    }

    pub async fn delete_from_cache(&self, key: &str) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        let key = namespaced(key);
        store.delete(&key).await.unwrap_or_else(|e| {
            warn!(key = %key, "Cache delete failed: {e}");
            false
        })
    }

    /// Removes every key matching `pattern` (prefix is added automatically).
    pub async fn clear_cache_pattern(&self, pattern: &str) -> usize {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        let pattern = namespaced(pattern);
        store.delete_matching(&pattern).await.unwrap_or_else(|e| {
            warn!(pattern = %pattern, "Cache pattern clear failed: {e}");
            0
        })
    }
}

fn namespaced(key: &str) -> String {
    if key.starts_with(KEY_PREFIX) {
        key.to_string()
    } else {
        format!("{KEY_PREFIX}{key}")
    }
}

/// Builds a cache key `<namespace>:<sha256 of parts>`. Parts are
/// length-delimited so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn cache_key(namespace: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{namespace}:{:x}", hasher.finalize())
}

/// Redis glob match: `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and `\x` escapes.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    match_from(&p, &t)
}

fn match_from(p: &[char], t: &[char]) -> bool {
    let Some((&head, rest)) = p.split_first() else {
        return t.is_empty();
    };

    match head {
        '*' => {
            let rest = &rest[rest.iter().take_while(|c| **c == '*').count()..];
            rest.is_empty() || (0..=t.len()).any(|i| match_from(rest, &t[i..]))
        }
        '?' => !t.is_empty() && match_from(rest, &t[1..]),
        '[' => match t.split_first() {
            Some((&c, t_rest)) => {
                let (matched, consumed) = match_class(rest, c);
                matched && match_from(&rest[consumed..], t_rest)
            }
            None => false,
        },
        '\\' if !rest.is_empty() => {
            t.first() == Some(&rest[0]) && match_from(&rest[1..], &t[1..])
        }
        literal => t.first() == Some(&literal) && match_from(rest, &t[1..]),
    }
}

/// Matches `c` against the class body following `[`. Returns whether it
/// matched and how many pattern chars were consumed, closing `]` included.
/// An unterminated class runs to the end of the pattern, as in Redis.
fn match_class(p: &[char], c: char) -> (bool, usize) {
    let negate = p.first() == Some(&'^');
    let mut i = usize::from(negate);
    let mut matched = false;

    while i < p.len() && p[i] != ']' {
        if p[i] == '\\' && i + 1 < p.len() {
            matched |= p[i + 1] == c;
            i += 2;
        } else if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            let (lo, hi) = if p[i] <= p[i + 2] {
                (p[i], p[i + 2])
            } else {
                (p[i + 2], p[i])
            };
            matched |= (lo..=hi).contains(&c);
            i += 3;
        } else {
            matched |= p[i] == c;
            i += 1;
        }
    }
    if i < p.len() {
        i += 1;
    }

    (matched != negate, i)
}

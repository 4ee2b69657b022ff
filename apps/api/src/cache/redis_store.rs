//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;
use tracing::info;

use super::{CacheError, CacheStore};

/// Keys fetched per SCAN round trip when clearing by pattern.
const SCAN_BATCH: usize = 200;

/// Connect retries per attempt, backing off 100ms then 200ms.
const CONNECT_RETRIES: usize = 2;
const BACKOFF_BASE: u64 = 2;
const BACKOFF_FACTOR_MS: u64 = 50;

/// Cache store over a `ConnectionManager`, opened lazily on first use so
/// startup never blocks on Redis. The manager reconnects after a dropped
/// socket; the failing call still errors and is treated as a miss.
pub struct RedisCacheStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisCacheStore {
    pub fn open(url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            conn: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let conn = ConnectionManager::new_with_backoff(
                    self.client.clone(),
                    BACKOFF_BASE,
                    BACKOFF_FACTOR_MS,
                    CONNECT_RETRIES,
                )
                .await?;
                info!("Redis cache connection established");
                Ok::<_, CacheError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        // Redis rejects EX 0.
        let seconds = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection().await?;
        let removed: usize = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, CacheError> {
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let n: usize = conn.del(&keys).await?;
                removed += n;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(removed)
    }
}

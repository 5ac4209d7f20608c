use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::redis::{AsyncCommands, cmd};

use super::r#trait::{CacheResult, CacheStore};

/// Keys fetched per `SCAN` round trip during pattern deletion.
const SCAN_BATCH: usize = 500;

/// Redis cache implementation using deadpool Redis pool
#[derive(Clone)]
pub struct RedisCache {
    pool: deadpool_redis::Pool,
}

impl RedisCache {
    pub fn new(pool: deadpool_redis::Pool) -> Self { Self { pool } }

    async fn scan_keys(
        conn: &mut deadpool_redis::Connection, pattern: &str,
    ) -> CacheResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may report a key more than once across iterations
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

impl From<deadpool_redis::Pool> for RedisCache {
    fn from(pool: deadpool_redis::Pool) -> Self { Self::new(pool) }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let mut conn = self.pool.get().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        let mut conn = self.pool.get().await?;
        // PSETEX rejects a zero expiry
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let _: () = conn.pset_ex(key, value.as_ref(), millis).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.pool.get().await?;
        let count: u64 = conn.del(key).await?;
        Ok(count > 0)
    }

    async fn remove_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.pool.get().await?;
        let keys = Self::scan_keys(&mut conn, pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let count: u64 = conn.del(&keys).await?;
        Ok(count)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let mut conn = self.pool.get().await?;
        // -2 when the key is missing, -1 when it has no expiry
        let millis: i64 = conn.pttl(key).await?;
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.pool.get().await?;
        cmd("FLUSHDB").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use deadpool_redis::{Config, Runtime};

    use super::*;

    fn test_store() -> RedisCache {
        let url = std::env::var("TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6380".to_string());
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .unwrap();
        RedisCache::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (TEST_REDIS_URL)"]
    async fn test_redis_set_get_ttl() {
        let store = test_store();
        store
            .set(
                "redis-test:item:1",
                Bytes::from_static(b"{\"id\":1}"),
                Duration::from_secs(600),
            )
            .await
            .unwrap();

        let value = store.get("redis-test:item:1").await.unwrap().unwrap();
        assert_eq!(&value[..], b"{\"id\":1}");

        let ttl = store.ttl("redis-test:item:1").await.unwrap().unwrap();
        assert!(ttl > Duration::from_secs(590));
        assert!(ttl <= Duration::from_secs(600));

        assert!(store.remove("redis-test:item:1").await.unwrap());
        assert!(store.get("redis-test:item:1").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (TEST_REDIS_URL)"]
    async fn test_redis_honours_sub_second_ttl() {
        let store = test_store();
        store
            .set(
                "redis-test:short",
                Bytes::from_static(b"1"),
                Duration::from_millis(300),
            )
            .await
            .unwrap();

        let ttl = store.ttl("redis-test:short").await.unwrap().unwrap();
        assert!(ttl <= Duration::from_millis(300));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(store.get("redis-test:short").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (TEST_REDIS_URL)"]
    async fn test_redis_remove_pattern() {
        let store = test_store();
        let ttl = Duration::from_secs(60);
        for key in [
            "redis-test:tasks:1",
            "redis-test:tasks:list:none",
            "redis-test-other:data",
        ] {
            store.set(key, Bytes::from_static(b"1"), ttl).await.unwrap();
        }

        let removed =
            store.remove_pattern("redis-test:tasks:*").await.unwrap();

        assert_eq!(removed, 2);
        assert!(store.exists("redis-test-other:data").await.unwrap());
        store.remove("redis-test-other:data").await.unwrap();
    }
}

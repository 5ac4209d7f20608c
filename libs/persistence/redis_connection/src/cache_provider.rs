use std::{future::Future, marker::PhantomData, sync::Arc, time::Duration};

use bytes::Bytes;
use futures::future::join_all;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    cache::{CacheStore, Invalidation, MemoryCache, RedisCache},
    config::CacheConfig,
    key::{CacheKey, KeyScheme},
};

/// Fail-open front of a [`CacheStore`].
///
/// Every backend or codec failure is logged and degraded: reads become
/// misses, writes and deletes become no-ops. Nothing here ever returns an
/// error, so a broken cache only costs extra trips to the database.
///
/// Cloning is cheap; all clones share the same store.
#[derive(Clone)]
pub struct CacheProvider {
    store: Arc<dyn CacheStore>,
    scheme: KeyScheme,
    default_ttl: Duration,
}

impl CacheProvider {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            scheme: KeyScheme::new(config.namespace.clone()),
            default_ttl: config.default_ttl(),
        }
    }

    /// Provider over a fresh in-process store.
    pub fn memory(config: &CacheConfig) -> Self {
        Self::new(Arc::new(MemoryCache::new(&config.memory)), config)
    }

    /// Provider over a Redis connection pool.
    pub fn redis(pool: deadpool_redis::Pool, config: &CacheConfig) -> Self {
        Self::new(Arc::new(RedisCache::new(pool)), config)
    }

    pub fn scheme(&self) -> &KeyScheme { &self.scheme }

    pub fn default_ttl(&self) -> Duration { self.default_ttl }

    /// Fully qualified key for `key` rendered with `args`.
    pub fn key<K: CacheKey>(&self, key: &K, args: K::Args<'_>) -> String {
        self.scheme.key(key, args)
    }

    /// Fully qualified glob for a relative pattern such as `tasks:list:*`.
    pub fn pattern(&self, relative: &str) -> String {
        self.scheme.pattern(relative)
    }

    /// Typed handle on one entry of the `key` family.
    pub fn entry<K: CacheKey>(
        &self, key: &K, args: K::Args<'_>,
    ) -> CacheEntry<'_, K::Value> {
        CacheEntry {
            provider: self,
            key: self.key(key, args),
            __phantom: PhantomData,
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(cache.key = key, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(cache.key = key, error = %err, "cache read failed");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(value) => {
                debug!(cache.key = key, "cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(cache.key = key, error = %err, "cached value unreadable");
                None
            }
        }
    }

    /// Store `value` as JSON under `key` for `ttl`, or the default TTL.
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set<T: Serialize + ?Sized>(
        &self, key: &str, value: &T, ttl: Option<Duration>,
    ) {
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => Bytes::from(payload),
            Err(err) => {
                warn!(cache.key = key, error = %err, "cache value not serializable");
                return;
            }
        };

        let ttl = ttl.unwrap_or(self.default_ttl);
        if let Err(err) = self.store.set(key, payload, ttl).await {
            warn!(cache.key = key, error = %err, "cache write failed");
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, key: &str) {
        if let Err(err) = self.store.remove(key).await {
            warn!(cache.key = key, error = %err, "cache delete failed");
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn delete_by_pattern(&self, pattern: &str) {
        match self.store.remove_pattern(pattern).await {
            Ok(removed) => {
                debug!(cache.pattern = pattern, removed, "pattern deleted")
            }
            Err(err) => {
                warn!(cache.pattern = pattern, error = %err, "cache pattern delete failed")
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.store.exists(key).await.unwrap_or_else(|err| {
            warn!(cache.key = key, error = %err, "cache exists check failed");
            false
        })
    }

    /// Remaining whole seconds of `key`, `-1` when absent, expired or
    /// unknown.
    pub async fn get_ttl(&self, key: &str) -> i64 {
        match self.store.ttl(key).await {
            Ok(Some(remaining)) => {
                let secs = (remaining.as_millis() + 500) / 1000;
                i64::try_from(secs).unwrap_or(i64::MAX)
            }
            Ok(None) => -1,
            Err(err) => {
                warn!(cache.key = key, error = %err, "cache ttl lookup failed");
                -1
            }
        }
    }

    /// Drop every entry. Administrative and test use only.
    pub async fn clear(&self) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "cache clear failed");
        }
    }

    /// Run every delete of `plan` concurrently. Each member is isolated:
    /// one failing delete neither aborts nor delays the others past their
    /// own completion.
    #[instrument(skip_all, fields(keys = plan.direct_keys().len(), patterns = plan.patterns().len()))]
    pub async fn invalidate(&self, plan: &Invalidation) {
        if plan.is_empty() {
            return;
        }

        let keys = join_all(plan.direct_keys().iter().map(|key| self.delete(key)));
        let patterns = join_all(
            plan.patterns()
                .iter()
                .map(|pattern| self.delete_by_pattern(pattern)),
        );
        futures::join!(keys, patterns);
    }
}

/// A cache key bound to the value type stored under it.
pub struct CacheEntry<'c, T> {
    provider: &'c CacheProvider,
    key: String,
    __phantom: PhantomData<fn() -> T>,
}

impl<T> CacheEntry<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn key(&self) -> &str { &self.key }

    pub async fn get(&self) -> Option<T> { self.provider.get(&self.key).await }

    pub async fn set(&self, value: &T) {
        self.provider.set(&self.key, value, None).await
    }

    pub async fn remove(&self) { self.provider.delete(&self.key).await }

    /// Cache-aside read: return the cached value, or run `load` and cache
    /// what it yields. Errors from `load` are returned as-is and never
    /// cached.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get().await {
            return Ok(cached);
        }

        let fresh = load().await?;
        self.set(&fresh).await;
        Ok(fresh)
    }
}

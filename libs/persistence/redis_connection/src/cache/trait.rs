use std::time::Duration;

use bytes::Bytes;

/// Cache-specific error type. Never leaves the crate boundary: the
/// `CacheProvider` logs it and degrades to a miss or a no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Raw key/value backend with per-entry TTL and glob deletion.
///
/// Values are opaque bytes; typing and JSON encoding happen one layer up in
/// [`CacheProvider`](crate::cache_provider::CacheProvider). Implementations
/// report failures honestly; swallowing them is the provider's job.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration)
    -> CacheResult<()>;

    /// Remove `key`. Returns whether an entry was removed.
    async fn remove(&self, key: &str) -> CacheResult<bool>;

    /// Remove every key matching the glob `pattern` in one batch.
    /// Returns the number of removed entries.
    async fn remove_pattern(&self, pattern: &str) -> CacheResult<u64>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Remaining lifetime of `key`, `None` when absent or without expiry.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Clear all entries (optional operation)
    async fn clear(&self) -> CacheResult<()> {
        Err(CacheError::Unsupported(
            "Clear operation not supported by this cache implementation"
                .to_string(),
        ))
    }
}

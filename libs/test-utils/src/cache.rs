use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use redis_connection::cache::{CacheError, CacheResult, CacheStore};

/// Store that behaves like an unreachable backend: every call fails.
#[derive(Debug, Default)]
pub struct FailingCacheStore {
    calls: AtomicUsize,
}

impl FailingCacheStore {
    pub fn new() -> Self { Self::default() }

    /// Number of calls attempted so far.
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    fn fail<T>(&self) -> CacheResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<Bytes>> { self.fail() }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> CacheResult<()> {
        self.fail()
    }

    async fn remove(&self, _key: &str) -> CacheResult<bool> { self.fail() }

    async fn remove_pattern(&self, _pattern: &str) -> CacheResult<u64> { self.fail() }

    async fn exists(&self, _key: &str) -> CacheResult<bool> { self.fail() }

    async fn ttl(&self, _key: &str) -> CacheResult<Option<Duration>> { self.fail() }

    async fn clear(&self) -> CacheResult<()> { self.fail() }
}

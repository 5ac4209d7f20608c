use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::{Expiry, future::Cache};

use super::{
    glob::glob_match,
    r#trait::{CacheResult, CacheStore},
};
use crate::config::MemoryConfig;

#[derive(Clone)]
struct MemoryEntry {
    value: Bytes,
    ttl: Duration,
    expires_at: Instant,
}

impl MemoryEntry {
    fn new(value: Bytes, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            expires_at: Instant::now() + ttl,
        }
    }

    fn remaining(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }

    fn is_expired(&self) -> bool { self.remaining().is_none_or(|d| d.is_zero()) }
}

/// Per-entry expiry: every entry lives for the TTL it was written with,
/// overwrites restart the clock.
struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &MemoryEntry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &MemoryEntry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache store backed by moka.
///
/// Moka evicts lazily, so reads also check the entry deadline themselves;
/// an entry is never served past its TTL.
#[derive(Clone)]
pub struct MemoryCache {
    memory: Cache<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new(config: &MemoryConfig) -> Self {
        let memory = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { memory }
    }

    async fn live_entry(&self, key: &str) -> Option<MemoryEntry> {
        match self.memory.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.memory.invalidate(key).await;
                None
            }
            entry => entry,
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self { Self::new(&MemoryConfig::default()) }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    async fn set(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.memory
            .insert(key.to_string(), MemoryEntry::new(value, ttl))
            .await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        Ok(self.memory.remove(key).await.is_some())
    }

    async fn remove_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let matching: Vec<String> = self
            .memory
            .iter()
            .filter(|(key, _)| glob_match(pattern, key))
            .map(|(key, _)| key.to_string())
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.memory.remove(&key).await.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        Ok(self
            .live_entry(key)
            .await
            .and_then(|entry| entry.remaining()))
    }

    async fn clear(&self) -> CacheResult<()> {
        self.memory.invalidate_all();
        self.memory.run_pending_tasks().await;
        Ok(())
    }
}

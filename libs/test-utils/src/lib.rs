//! Shared fixtures for handler and HTTP tests: in-memory repositories that
//! count their calls, cache providers over memory or a broken backend, and
//! entity builders.

pub mod cache;
pub mod fixtures;
pub mod redis;
pub mod repositories;

use std::sync::Arc;

pub use cache::FailingCacheStore;
pub use fixtures::*;
use redis_connection::{
    CacheProvider,
    config::{CacheBackendKind, CacheConfig},
};
pub use redis::TestRedis;
pub use repositories::{CallLog, InMemoryProjectRepository, InMemoryTaskRepository};

pub fn cache_config() -> CacheConfig {
    CacheConfig {
        backend: CacheBackendKind::Memory,
        ..CacheConfig::default()
    }
}

/// Fresh in-process cache with the production key namespace and TTL.
pub fn memory_cache() -> CacheProvider { CacheProvider::memory(&cache_config()) }

/// Cache whose every backend call fails, with the store to inspect.
pub fn failing_cache() -> (CacheProvider, Arc<FailingCacheStore>) {
    let store = Arc::new(FailingCacheStore::new());
    (CacheProvider::new(store.clone(), &cache_config()), store)
}

/// Repositories shared between handlers under test.
#[derive(Clone, Default)]
pub struct TestRepos {
    pub projects: Arc<InMemoryProjectRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
}

impl TestRepos {
    pub fn new() -> Self { Self::default() }

    pub fn project_repo(&self) -> Arc<dyn project_dao::ProjectRepository> {
        self.projects.clone()
    }

    pub fn task_repo(&self) -> Arc<dyn task_dao::TaskRepository> { self.tasks.clone() }

    pub fn reset_calls(&self) {
        self.projects.calls.reset();
        self.tasks.calls.reset();
    }

    /// Total repository calls across both repositories.
    pub fn total_calls(&self) -> usize {
        self.projects.calls.total() + self.tasks.calls.total()
    }
}

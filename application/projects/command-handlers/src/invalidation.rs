use project_cache_keys::{PROJECT_LISTS_PATTERN, ProjectCacheKey};
use redis_connection::{CacheProvider, Invalidation};
use task_cache_keys::{
    PROJECT_TASKS_PATTERN, ProjectTasksCacheKey, TASK_LISTS_PATTERN, TaskCacheKey,
};
use uuid::Uuid;

pub fn project_created(cache: &CacheProvider) -> Invalidation {
    Invalidation::new().pattern(cache.pattern(PROJECT_LISTS_PATTERN))
}

/// Task collections embed the project name, so they all go too.
pub fn project_updated(cache: &CacheProvider, project_id: Uuid) -> Invalidation {
    Invalidation::new()
        .key(cache.key(&ProjectCacheKey, (&project_id,)))
        .pattern(cache.pattern(PROJECT_LISTS_PATTERN))
        .pattern(cache.pattern(PROJECT_TASKS_PATTERN))
}

pub fn project_deleted(
    cache: &CacheProvider, project_id: Uuid, task_ids: &[Uuid],
) -> Invalidation {
    Invalidation::new()
        .key(cache.key(&ProjectCacheKey, (&project_id,)))
        .keys(task_ids.iter().map(|id| cache.key(&TaskCacheKey, (id,))))
        .key(cache.key(&ProjectTasksCacheKey, (&project_id,)))
        .pattern(cache.pattern(PROJECT_LISTS_PATTERN))
        .pattern(cache.pattern(TASK_LISTS_PATTERN))
}

/// Tasks removed while the project itself survived.
pub(crate) fn owned_tasks_deleted(
    cache: &CacheProvider, project_id: Uuid, task_ids: &[Uuid],
) -> Invalidation {
    Invalidation::new()
        .key(cache.key(&ProjectCacheKey, (&project_id,)))
        .keys(task_ids.iter().map(|id| cache.key(&TaskCacheKey, (id,))))
        .key(cache.key(&ProjectTasksCacheKey, (&project_id,)))
        .pattern(cache.pattern(TASK_LISTS_PATTERN))
}

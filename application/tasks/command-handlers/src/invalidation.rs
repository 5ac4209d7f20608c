use project_cache_keys::ProjectCacheKey;
use redis_connection::{CacheProvider, Invalidation};
use task_cache_keys::{ProjectTasksCacheKey, TASK_LISTS_PATTERN, TaskCacheKey};
use uuid::Uuid;

/// Entries embedding a project's task collection.
fn owning_project(cache: &CacheProvider, project_id: Uuid) -> Invalidation {
    Invalidation::new()
        .key(cache.key(&ProjectCacheKey, (&project_id,)))
        .key(cache.key(&ProjectTasksCacheKey, (&project_id,)))
        .pattern(cache.pattern(TASK_LISTS_PATTERN))
}

pub fn task_created(cache: &CacheProvider, project_id: Uuid) -> Invalidation {
    owning_project(cache, project_id)
}

/// Update and delete of a single task.
pub fn task_changed(
    cache: &CacheProvider, task_id: Uuid, project_id: Uuid,
) -> Invalidation {
    owning_project(cache, project_id).key(cache.key(&TaskCacheKey, (&task_id,)))
}

pub fn project_tasks_deleted(
    cache: &CacheProvider, project_id: Uuid, task_ids: &[Uuid],
) -> Invalidation {
    owning_project(cache, project_id)
        .keys(task_ids.iter().map(|id| cache.key(&TaskCacheKey, (id,))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_changed_plan() {
        let cache = test_utils::memory_cache();
        let (task_id, project_id) = (Uuid::now_v7(), Uuid::now_v7());

        let plan = task_changed(&cache, task_id, project_id);

        assert_eq!(
            plan.direct_keys(),
            [
                format!("app:projects:{project_id}"),
                format!("app:tasks:project:{project_id}"),
                format!("app:tasks:{task_id}"),
            ]
        );
        assert_eq!(plan.patterns(), ["app:tasks:list:*"]);
    }

    #[test]
    fn test_bulk_delete_plan_names_every_task() {
        let cache = test_utils::memory_cache();
        let project_id = Uuid::now_v7();
        let ids = [Uuid::now_v7(), Uuid::now_v7()];

        let plan = project_tasks_deleted(&cache, project_id, &ids);

        assert_eq!(plan.direct_keys().len(), 4);
        for id in ids {
            assert!(plan.direct_keys().contains(&format!("app:tasks:{id}")));
        }
    }
}

use dao_utils::Pagination;
use redis_connection::{ListFilters, ListQueryKey, cache_key};
use task_queries::TaskFilters;
use task_responses::{ProjectTasksResponse, TaskListResponse, TaskResponse};
use uuid::Uuid;

cache_key!(TaskCacheKey::<TaskResponse> => "tasks:{}"[id: Uuid]);
cache_key!(TaskListCacheKey::<TaskListResponse> => "tasks:list:{}"[query: ListQueryKey]);
cache_key!(ProjectTasksCacheKey::<ProjectTasksResponse> => "tasks:project:{}"[project_id: Uuid]);

pub const TASK_LISTS_PATTERN: &str = "tasks:list:*";
/// Every project's cached task collection.
pub const PROJECT_TASKS_PATTERN: &str = "tasks:project:*";

pub fn task_list_query(pagination: &Pagination, filters: &TaskFilters) -> ListQueryKey {
    let filters = ListFilters::new()
        .with("project_id", filters.project_id)
        .with("status", filters.status)
        .with("priority", filters.priority)
        .with("assignee", filters.assignee.as_deref())
        .with("tag", filters.tag.as_deref());
    ListQueryKey::new(pagination.page(), pagination.limit(), filters)
}

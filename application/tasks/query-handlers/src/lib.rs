use std::sync::Arc;

use project_dao::ProjectRepository;
use redis_connection::CacheProvider;
use task_cache_keys::{
    ProjectTasksCacheKey, TaskCacheKey, TaskListCacheKey, task_list_query,
};
use task_dao::TaskRepository;
use task_errors::TaskError;
use task_queries::{GetProjectTasksQuery, GetTaskQuery, ListTasksQuery};
use task_responses::{ProjectTasksResponse, TaskListResponse, TaskResponse};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct GetTaskQueryHandler {
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl GetTaskQueryHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, cache: CacheProvider) -> Self {
        Self { tasks, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, query: GetTaskQuery) -> Result<TaskResponse, TaskError> {
        let task_id = query.task_id;
        let tasks = &self.tasks;

        self.cache
            .entry(&TaskCacheKey, (&task_id,))
            .get_or_load(move || async move {
                debug!(%task_id, "task cache miss");

                let task = tasks
                    .find_by_id(task_id)
                    .await?
                    .ok_or(TaskError::NotFound { task_id })?;
                Ok::<_, TaskError>(task.into())
            })
            .await
    }
}

#[derive(Clone)]
pub struct ListTasksQueryHandler {
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl ListTasksQueryHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, cache: CacheProvider) -> Self {
        Self { tasks, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ListTasksQuery,
    ) -> Result<TaskListResponse, TaskError> {
        let pagination = query.pagination();
        let filters = query.filters();
        let entry = self.cache.entry(
            &TaskListCacheKey,
            (&task_list_query(&pagination, &filters),),
        );
        let (tasks, key) = (&self.tasks, entry.key());

        entry
            .get_or_load(move || async move {
                debug!(key, "task list cache miss");

                let page = tasks.find_all(&filters, pagination).await?;
                Ok::<_, TaskError>(TaskListResponse::new(page, pagination))
            })
            .await
    }
}

/// Tasks of one project, in creation order.
#[derive(Clone)]
pub struct GetProjectTasksQueryHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl GetProjectTasksQueryHandler {
    pub fn new(
        projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>,
        cache: CacheProvider,
    ) -> Self {
        Self {
            projects,
            tasks,
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetProjectTasksQuery,
    ) -> Result<ProjectTasksResponse, TaskError> {
        let project_id = query.project_id;
        let (projects, tasks) = (&self.projects, &self.tasks);

        self.cache
            .entry(&ProjectTasksCacheKey, (&project_id,))
            .get_or_load(move || async move {
                debug!(%project_id, "project tasks cache miss");

                let project = projects
                    .find_by_id(project_id)
                    .await?
                    .ok_or(TaskError::ProjectNotFound { project_id })?;
                let owned = tasks.find_by_project_id(project_id).await?;

                Ok::<_, TaskError>(ProjectTasksResponse::new(
                    project_id,
                    project.name,
                    owned,
                ))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use task_models::{TaskPriority, TaskStatus};
    use test_utils::*;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_get_task_miss_then_hit() {
        let repos = TestRepos::new();
        let cache = memory_cache();
        let handler = GetTaskQueryHandler::new(repos.task_repo(), cache.clone());
        let task = task_for(Uuid::now_v7(), "Read me");
        repos.tasks.insert(task.clone());

        let first = handler
            .execute(GetTaskQuery { task_id: task.id })
            .await
            .unwrap();
        let second = handler
            .execute(GetTaskQuery { task_id: task.id })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Read me");
        assert_eq!(repos.tasks.calls.count("find_by_id"), 1);
    }

    #[tokio::test]
    async fn test_get_task_served_from_cache_only() {
        let repos = TestRepos::new();
        let cache = memory_cache();
        let handler = GetTaskQueryHandler::new(repos.task_repo(), cache.clone());
        let task = task_for(Uuid::now_v7(), "Ghost");
        cache
            .entry(&TaskCacheKey, (&task.id,))
            .set(&TaskResponse::from(task.clone()))
            .await;

        let served = handler
            .execute(GetTaskQuery { task_id: task.id })
            .await
            .unwrap();

        assert_eq!(served.id, task.id);
        assert_eq!(repos.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_task() {
        let repos = TestRepos::new();
        let handler = GetTaskQueryHandler::new(repos.task_repo(), memory_cache());

        let result = handler
            .execute(GetTaskQuery {
                task_id: Uuid::now_v7(),
            })
            .await;

        assert!(matches!(result, Err(TaskError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_filters_and_caches() {
        let repos = TestRepos::new();
        let cache = memory_cache();
        let handler = ListTasksQueryHandler::new(repos.task_repo(), cache.clone());
        let project_id = Uuid::now_v7();
        let mut urgent = task_for(project_id, "Urgent");
        urgent.priority = TaskPriority::High;
        urgent.tags = vec!["ops".into()];
        repos.tasks.insert(urgent.clone());
        repos.tasks.insert(task_for(project_id, "Later"));

        let query = ListTasksQuery {
            priority: Some(TaskPriority::High),
            tag: Some("ops".into()),
            ..Default::default()
        };
        let first = handler.execute(query.clone()).await.unwrap();
        let second = handler.execute(query).await.unwrap();

        assert_eq!(first.total, 1);
        assert_eq!(first.items[0].id, urgent.id);
        assert_eq!(first, second);
        assert_eq!(repos.tasks.calls.count("find_all"), 1);

        let everything = handler.execute(ListTasksQuery::default()).await.unwrap();
        assert_eq!(everything.total, 2);
        assert_eq!(repos.tasks.calls.count("find_all"), 2);
    }

    #[tokio::test]
    async fn test_project_tasks_in_creation_order() {
        let repos = TestRepos::new();
        let cache = memory_cache();
        let handler = GetProjectTasksQueryHandler::new(
            repos.project_repo(),
            repos.task_repo(),
            cache.clone(),
        );
        let project = project_named("Ordered");
        repos.projects.insert(project.clone());
        let titles = ["one", "two", "three"];
        for title in titles {
            repos.tasks.insert(task_for(project.id, title));
        }
        let mut done = task_for(Uuid::now_v7(), "foreign");
        done.status = TaskStatus::Done;
        repos.tasks.insert(done);

        let response = handler
            .execute(GetProjectTasksQuery {
                project_id: project.id,
            })
            .await
            .unwrap();

        assert_eq!(response.project_name, "Ordered");
        assert_eq!(response.total, 3);
        let got: Vec<_> = response.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(got, titles);

        repos.reset_calls();
        handler
            .execute(GetProjectTasksQuery {
                project_id: project.id,
            })
            .await
            .unwrap();
        assert_eq!(repos.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_project_tasks_for_unknown_project() {
        let repos = TestRepos::new();
        let cache = memory_cache();
        let handler = GetProjectTasksQueryHandler::new(
            repos.project_repo(),
            repos.task_repo(),
            cache.clone(),
        );
        let project_id = Uuid::now_v7();

        let result = handler.execute(GetProjectTasksQuery { project_id }).await;

        assert!(matches!(result, Err(TaskError::ProjectNotFound { .. })));
        assert_eq!(repos.tasks.calls.count("find_by_project_id"), 0);
        let key = cache.key(&ProjectTasksCacheKey, (&project_id,));
        assert!(!cache.exists(&key).await);
    }

    #[tokio::test]
    async fn test_reads_survive_broken_cache() {
        let repos = TestRepos::new();
        let (cache, _store) = failing_cache();
        let handler = GetTaskQueryHandler::new(repos.task_repo(), cache);
        let task = task_for(Uuid::now_v7(), "Degraded");
        repos.tasks.insert(task.clone());

        for _ in 0..3 {
            let loaded = handler
                .execute(GetTaskQuery { task_id: task.id })
                .await
                .unwrap();
            assert_eq!(loaded.id, task.id);
        }
        assert_eq!(repos.tasks.calls.count("find_by_id"), 3);
    }
}

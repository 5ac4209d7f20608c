use std::sync::Arc;

use project_cache_keys::{ProjectCacheKey, ProjectListCacheKey, project_list_query};
use project_dao::ProjectRepository;
use project_errors::ProjectError;
use project_queries::{GetProjectQuery, ListProjectsQuery};
use project_responses::{ProjectListResponse, ProjectResponse};
use redis_connection::CacheProvider;
use task_dao::TaskRepository;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct GetProjectQueryHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl GetProjectQueryHandler {
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
        &self, query: GetProjectQuery,
    ) -> Result<ProjectResponse, ProjectError> {
        let project_id = query.project_id;
        let (projects, tasks) = (&self.projects, &self.tasks);

        self.cache
            .entry(&ProjectCacheKey, (&project_id,))
            .get_or_load(move || async move {
                debug!(%project_id, "project cache miss");

                let project = projects
                    .find_by_id(project_id)
                    .await?
                    .ok_or(ProjectError::NotFound { project_id })?;
                let tasks = tasks
                    .find_by_project_id(project_id)
                    .await
                    .map_err(|err| err.into_project_error())?;

                Ok::<_, ProjectError>(ProjectResponse::new(project, tasks))
            })
            .await
    }
}

#[derive(Clone)]
pub struct ListProjectsQueryHandler {
    projects: Arc<dyn ProjectRepository>,
    cache: CacheProvider,
}

impl ListProjectsQueryHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>, cache: CacheProvider) -> Self {
        Self { projects, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ListProjectsQuery,
    ) -> Result<ProjectListResponse, ProjectError> {
        let pagination = query.pagination();
        let filters = query.filters();
        let entry = self.cache.entry(
            &ProjectListCacheKey,
            (&project_list_query(&pagination, &filters),),
        );
        let (projects, key) = (&self.projects, entry.key());

        entry
            .get_or_load(move || async move {
                debug!(key, "project list cache miss");

                let page = projects.find_all(&filters, pagination).await?;
                Ok::<_, ProjectError>(ProjectListResponse::new(page, pagination))
            })
            .await
    }
}

use std::sync::Arc;

use project_commands::{
    CreateProjectCommand, DeleteProjectCommand, UpdateProjectCommand,
};
use project_dao::ProjectRepository;
use project_errors::ProjectError;
use project_models::Project;
use project_responses::ProjectResponse;
use redis_connection::CacheProvider;
use task_dao::TaskRepository;
use tracing::instrument;

pub mod invalidation;

#[derive(Clone)]
pub struct CreateProjectHandler {
    projects: Arc<dyn ProjectRepository>,
    cache: CacheProvider,
}

impl CreateProjectHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>, cache: CacheProvider) -> Self {
        Self { projects, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: CreateProjectCommand,
    ) -> Result<ProjectResponse, ProjectError> {
        let command = command.validated()?;
        let project = Project::new(command.name, command.description);

        let saved = self.projects.save(&project).await?;

        self.cache
            .invalidate(&invalidation::project_created(&self.cache))
            .await;

        Ok(ProjectResponse::new(saved, Vec::new()))
    }
}

#[derive(Clone)]
pub struct UpdateProjectHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl UpdateProjectHandler {
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
        &self, command: UpdateProjectCommand,
    ) -> Result<ProjectResponse, ProjectError> {
        let command = command.validated()?;
        let project_id = command.project_id;

        // read before writing so nothing can fail once the update commits
        let tasks = self
            .tasks
            .find_by_project_id(project_id)
            .await
            .map_err(|err| err.into_project_error())?;

        let updated = self
            .projects
            .update(&command)
            .await?
            .ok_or(ProjectError::NotFound { project_id })?;

        self.cache
            .invalidate(&invalidation::project_updated(&self.cache, project_id))
            .await;

        Ok(ProjectResponse::new(updated, tasks))
    }
}

/// Deletes a project together with every task it owns.
#[derive(Clone)]
pub struct DeleteProjectHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl DeleteProjectHandler {
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
        &self, command: DeleteProjectCommand,
    ) -> Result<(), ProjectError> {
        let project_id = command.project_id;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(ProjectError::NotFound { project_id });
        }

        let task_ids = self
            .tasks
            .delete_by_project_id(project_id)
            .await
            .map_err(|err| err.into_project_error())?;

        let deleted = match self.projects.delete(project_id).await {
            Ok(deleted) => deleted,
            Err(err) => {
                // the tasks are gone even though the project survived
                self.cache
                    .invalidate(&invalidation::owned_tasks_deleted(
                        &self.cache,
                        project_id,
                        &task_ids,
                    ))
                    .await;
                return Err(err);
            }
        };

        self.cache
            .invalidate(&invalidation::project_deleted(
                &self.cache,
                project_id,
                &task_ids,
            ))
            .await;

        if !deleted {
            return Err(ProjectError::NotFound { project_id });
        }
        Ok(())
    }
}

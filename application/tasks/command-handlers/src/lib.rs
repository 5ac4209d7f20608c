use std::sync::Arc;

use project_dao::ProjectRepository;
use redis_connection::CacheProvider;
use task_commands::{
    CreateTaskCommand, DeleteProjectTasksCommand, DeleteTaskCommand, UpdateTaskCommand,
};
use task_dao::TaskRepository;
use task_errors::TaskError;
use task_responses::{DeletedTasksResponse, TaskResponse};
use tracing::{info, instrument};

pub mod invalidation;

#[derive(Clone)]
pub struct CreateTaskHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl CreateTaskHandler {
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
        &self, command: CreateTaskCommand,
    ) -> Result<TaskResponse, TaskError> {
        let command = command.validated()?;
        let project_id = command.project_id;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(TaskError::ProjectNotFound { project_id });
        }

        let saved = self.tasks.save(&command.into_task()).await?;

        self.cache
            .invalidate(&invalidation::task_created(&self.cache, project_id))
            .await;

        Ok(saved.into())
    }
}

#[derive(Clone)]
pub struct UpdateTaskHandler {
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl UpdateTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, cache: CacheProvider) -> Self {
        Self { tasks, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: UpdateTaskCommand,
    ) -> Result<TaskResponse, TaskError> {
        let command = command.validated()?;
        let task_id = command.task_id;

        let updated = self
            .tasks
            .update(&command)
            .await?
            .ok_or(TaskError::NotFound { task_id })?;

        self.cache
            .invalidate(&invalidation::task_changed(
                &self.cache,
                task_id,
                updated.project_id,
            ))
            .await;

        Ok(updated.into())
    }
}

#[derive(Clone)]
pub struct DeleteTaskHandler {
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl DeleteTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, cache: CacheProvider) -> Self {
        Self { tasks, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, command: DeleteTaskCommand) -> Result<(), TaskError> {
        let task_id = command.task_id;

        // the owning project is only known before the row goes away
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskError::NotFound { task_id })?;

        if !self.tasks.delete(task_id).await? {
            return Err(TaskError::NotFound { task_id });
        }

        self.cache
            .invalidate(&invalidation::task_changed(
                &self.cache,
                task_id,
                task.project_id,
            ))
            .await;

        Ok(())
    }
}

/// Removes every task of a project, leaving the project itself in place.
#[derive(Clone)]
pub struct DeleteProjectTasksHandler {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider,
}

impl DeleteProjectTasksHandler {
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
        &self, command: DeleteProjectTasksCommand,
    ) -> Result<DeletedTasksResponse, TaskError> {
        let project_id = command.project_id;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(TaskError::ProjectNotFound { project_id });
        }

        let task_ids = self.tasks.delete_by_project_id(project_id).await?;
        info!(%project_id, deleted = task_ids.len(), "project tasks deleted");

        self.cache
            .invalidate(&invalidation::project_tasks_deleted(
                &self.cache,
                project_id,
                &task_ids,
            ))
            .await;

        Ok(DeletedTasksResponse {
            project_id,
            deleted: task_ids.len() as u64,
        })
    }
}

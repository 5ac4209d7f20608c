use common_errors::AppError;
use project_errors::ProjectError;
use sql_connection::{deadpool_postgres::PoolError, tokio_postgres};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {task_id}")]
    NotFound { task_id: Uuid },
    #[error("Project not found: {project_id}")]
    ProjectNotFound { project_id: Uuid },
    #[error("Invalid task: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] PoolError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Report a task-side failure met while serving a project operation.
    pub fn into_project_error(self) -> ProjectError {
        match self {
            TaskError::Database(err) => ProjectError::Database(err),
            TaskError::DatabasePool(err) => ProjectError::DatabasePool(err),
            TaskError::Project(err) => err,
            TaskError::ProjectNotFound { project_id } => {
                ProjectError::NotFound { project_id }
            }
            other => ProjectError::Internal(other.to_string()),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound { task_id } => {
                AppError::not_found(
                    "TASK_NOT_FOUND",
                    &format!("Task with ID {task_id} not found"),
                )
            }
            TaskError::ProjectNotFound { project_id } => {
                AppError::not_found(
                    "PROJECT_NOT_FOUND",
                    &format!("Project with ID {project_id} not found"),
                )
            }
            TaskError::Validation(reason) => {
                AppError::validation(
                    "TASK_VALIDATION_FAILED",
                    "Task data is invalid",
                )
                .with_details(reason)
            }
            TaskError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            TaskError::DatabasePool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
            TaskError::Project(project_err) => project_err.into(),
            TaskError::Internal(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}

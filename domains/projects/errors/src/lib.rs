use common_errors::AppError;
use sql_connection::{deadpool_postgres::PoolError, tokio_postgres};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project not found: {project_id}")]
    NotFound { project_id: Uuid },
    #[error("Invalid project: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] PoolError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound { project_id } => {
                AppError::not_found(
                    "PROJECT_NOT_FOUND",
                    &format!("Project with ID {project_id} not found"),
                )
            }
            ProjectError::Validation(reason) => {
                AppError::validation(
                    "PROJECT_VALIDATION_FAILED",
                    "Project data is invalid",
                )
                .with_details(reason)
            }
            ProjectError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            ProjectError::DatabasePool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
            ProjectError::Internal(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use common_errors::AppError;
use project_dao::ProjectRepository;
use redis_connection::CacheProvider;
use task_command_handlers::{
    CreateTaskHandler, DeleteProjectTasksHandler, DeleteTaskHandler, UpdateTaskHandler,
};
use task_commands::{
    CreateTaskCommand, DeleteProjectTasksCommand, DeleteTaskCommand, UpdateTaskCommand,
};
use task_dao::TaskRepository;
use task_queries::{GetProjectTasksQuery, GetTaskQuery, ListTasksQuery};
use task_query_handlers::{
    GetProjectTasksQueryHandler, GetTaskQueryHandler, ListTasksQueryHandler,
};
use task_responses::{
    DeletedTasksResponse, ProjectTasksResponse, TaskListResponse, TaskResponse,
};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskServices {
    pub create_task: CreateTaskHandler,
    pub update_task: UpdateTaskHandler,
    pub delete_task: DeleteTaskHandler,
    pub delete_project_tasks: DeleteProjectTasksHandler,

    pub get_task: GetTaskQueryHandler,
    pub list_tasks: ListTasksQueryHandler,
    pub get_project_tasks: GetProjectTasksQueryHandler,
}

impl TaskServices {
    pub fn new(
        projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>,
        cache: CacheProvider,
    ) -> Self {
        Self {
            create_task: CreateTaskHandler::new(
                projects.clone(),
                tasks.clone(),
                cache.clone(),
            ),
            update_task: UpdateTaskHandler::new(tasks.clone(), cache.clone()),
            delete_task: DeleteTaskHandler::new(tasks.clone(), cache.clone()),
            delete_project_tasks: DeleteProjectTasksHandler::new(
                projects.clone(),
                tasks.clone(),
                cache.clone(),
            ),
            get_task: GetTaskQueryHandler::new(tasks.clone(), cache.clone()),
            list_tasks: ListTasksQueryHandler::new(tasks.clone(), cache.clone()),
            get_project_tasks: GetProjectTasksQueryHandler::new(projects, tasks, cache),
        }
    }
}

/// Task routes, including the task collection nested under a project.
pub fn routes(services: TaskServices) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/projects/{id}/tasks",
            get(get_project_tasks).delete(delete_project_tasks),
        )
        .with_state(services)
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskCommand,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Malformed request body", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 422, description = "Validation error", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn create_task(
    State(services): State<TaskServices>,
    body: Result<Json<CreateTaskCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let Json(command) = body?;
    let result = services.create_task.execute(command).await?;

    tracing::info!(task_id = %result.id, project_id = %result.project_id, "task created");

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "One page of tasks", body = TaskListResponse),
        (status = 400, description = "Invalid query parameters", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn list_tasks(
    State(services): State<TaskServices>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<TaskListResponse>, AppError> {
    let Query(query) = query?;
    Ok(Json(services.list_tasks.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Task not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn get_task(
    State(services): State<TaskServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TaskResponse>, AppError> {
    let Path(task_id) = path?;
    let task = services.get_task.execute(GetTaskQuery { task_id }).await?;

    Ok(Json(task))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    request_body = UpdateTaskCommand,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Malformed request", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Task not found", body = common_errors::ApiErrorResponse),
        (status = 422, description = "Validation error", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn update_task(
    State(services): State<TaskServices>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTaskCommand>, JsonRejection>,
) -> Result<Json<TaskResponse>, AppError> {
    let Path(id) = path?;
    let Json(mut command) = body?;
    command.task_id = id;
    let result = services.update_task.execute(command).await?;

    tracing::info!(task_id = %id, "task updated");

    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Task not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn delete_task(
    State(services): State<TaskServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(task_id) = path?;
    services
        .delete_task
        .execute(DeleteTaskCommand { task_id })
        .await?;

    tracing::info!(%task_id, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/projects/{id}/tasks",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Tasks of the project in creation order", body = ProjectTasksResponse),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn get_project_tasks(
    State(services): State<TaskServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProjectTasksResponse>, AppError> {
    let Path(project_id) = path?;
    let tasks = services
        .get_project_tasks
        .execute(GetProjectTasksQuery { project_id })
        .await?;

    Ok(Json(tasks))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/tasks",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Number of tasks deleted", body = DeletedTasksResponse),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip_all)]
pub async fn delete_project_tasks(
    State(services): State<TaskServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedTasksResponse>, AppError> {
    let Path(project_id) = path?;
    let result = services
        .delete_project_tasks
        .execute(DeleteProjectTasksCommand { project_id })
        .await?;

    tracing::info!(%project_id, deleted = result.deleted, "project tasks deleted");

    Ok(Json(result))
}

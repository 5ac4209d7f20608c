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
use project_command_handlers::{
    CreateProjectHandler, DeleteProjectHandler, UpdateProjectHandler,
};
use project_commands::{
    CreateProjectCommand, DeleteProjectCommand, UpdateProjectCommand,
};
use project_dao::ProjectRepository;
use project_queries::{GetProjectQuery, ListProjectsQuery};
use project_query_handlers::{GetProjectQueryHandler, ListProjectsQueryHandler};
use project_responses::{ProjectListResponse, ProjectResponse};
use redis_connection::CacheProvider;
use task_dao::TaskRepository;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProjectServices {
    pub create_project: CreateProjectHandler,
    pub update_project: UpdateProjectHandler,
    pub delete_project: DeleteProjectHandler,

    pub get_project: GetProjectQueryHandler,
    pub list_projects: ListProjectsQueryHandler,
}

impl ProjectServices {
    pub fn new(
        projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>,
        cache: CacheProvider,
    ) -> Self {
        Self {
            create_project: CreateProjectHandler::new(projects.clone(), cache.clone()),
            update_project: UpdateProjectHandler::new(
                projects.clone(),
                tasks.clone(),
                cache.clone(),
            ),
            delete_project: DeleteProjectHandler::new(
                projects.clone(),
                tasks.clone(),
                cache.clone(),
            ),
            get_project: GetProjectQueryHandler::new(projects.clone(), tasks, cache.clone()),
            list_projects: ListProjectsQueryHandler::new(projects, cache),
        }
    }
}

pub fn routes(services: ProjectServices) -> Router {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .with_state(services)
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectCommand,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Malformed request body", body = common_errors::ApiErrorResponse),
        (status = 422, description = "Validation error", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "projects"
)]
#[instrument(skip_all)]
pub async fn create_project(
    State(services): State<ProjectServices>,
    body: Result<Json<CreateProjectCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let Json(command) = body?;
    let result = services.create_project.execute(command).await?;

    tracing::info!(project_id = %result.id, "project created");

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "One page of projects", body = ProjectListResponse),
        (status = 400, description = "Invalid query parameters", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "projects"
)]
#[instrument(skip_all)]
pub async fn list_projects(
    State(services): State<ProjectServices>,
    query: Result<Query<ListProjectsQuery>, QueryRejection>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let Query(query) = query?;
    let page = services.list_projects.execute(query).await?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project with its tasks", body = ProjectResponse),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "projects"
)]
#[instrument(skip_all)]
pub async fn get_project(
    State(services): State<ProjectServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProjectResponse>, AppError> {
    let Path(project_id) = path?;
    let project = services
        .get_project
        .execute(GetProjectQuery { project_id })
        .await?;

    Ok(Json(project))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    request_body = UpdateProjectCommand,
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Malformed request", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 422, description = "Validation error", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "projects"
)]
#[instrument(skip_all)]
pub async fn update_project(
    State(services): State<ProjectServices>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateProjectCommand>, JsonRejection>,
) -> Result<Json<ProjectResponse>, AppError> {
    let Path(id) = path?;
    let Json(mut command) = body?;
    command.project_id = id;
    let result = services.update_project.execute(command).await?;

    tracing::info!(project_id = %id, "project updated");

    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project and its tasks deleted"),
        (status = 400, description = "Invalid UUID format", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Project not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "projects"
)]
#[instrument(skip_all)]
pub async fn delete_project(
    State(services): State<ProjectServices>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(project_id) = path?;
    services
        .delete_project
        .execute(DeleteProjectCommand { project_id })
        .await?;

    tracing::info!(%project_id, "project deleted");

    Ok(StatusCode::NO_CONTENT)
}

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use project_dao::ProjectRepository;
use project_http::ProjectServices;
use redis_connection::CacheProvider;
use sql_connection::SqlConnect;
use task_dao::TaskRepository;
use task_http::TaskServices;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// What the health endpoint reports on.
#[derive(Clone)]
pub struct HealthState {
    pub db: Option<SqlConnect>,
    pub cache_backend: &'static str,
}

/// Wire handlers, routes and documentation into one router.
pub fn compose(
    projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>,
    cache: CacheProvider, health: HealthState,
) -> Router {
    let project_routes = project_http::routes(ProjectServices::new(
        projects.clone(),
        tasks.clone(),
        cache.clone(),
    ));
    let task_routes = task_http::routes(TaskServices::new(projects, tasks, cache));

    Router::new()
        .route("/health", get(health_check))
        .with_state(health)
        .merge(project_routes)
        .merge(task_routes)
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        project_http::create_project,
        project_http::list_projects,
        project_http::get_project,
        project_http::update_project,
        project_http::delete_project,
        task_http::create_task,
        task_http::list_tasks,
        task_http::get_task,
        task_http::update_task,
        task_http::delete_task,
        task_http::get_project_tasks,
        task_http::delete_project_tasks
    ),
    components(
        schemas(
            project_commands::CreateProjectCommand,
            project_commands::UpdateProjectCommand,
            project_responses::ProjectResponse,
            project_responses::ProjectSummaryResponse,
            project_responses::ProjectListResponse,
            task_commands::CreateTaskCommand,
            task_commands::UpdateTaskCommand,
            task_responses::TaskResponse,
            task_responses::TaskListResponse,
            task_responses::ProjectTasksResponse,
            task_responses::DeletedTasksResponse,
            common_errors::ApiErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "projects", description = "Project management endpoints"),
        (name = "tasks", description = "Task management endpoints")
    ),
    info(
        title = "Taskhub API",
        description = "Project and task tracking with a fail-open read-through cache",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up, with pool and cache backend status", body = String)
    ),
    tag = "health"
)]
async fn health_check(State(health): State<HealthState>) -> (StatusCode, String) {
    let pool = match &health.db {
        Some(db) => {
            let (available, size) = db.pool_status();
            format!("Pool: {available}/{size} available")
        }
        None => "Pool: not configured".to_string(),
    };

    (
        StatusCode::OK,
        format!("OK - {pool}, Cache: {}", health.cache_backend),
    )
}

use chrono::{DateTime, Utc};
use dao_utils::{Paged, Pagination};
use project_models::{Project, ProjectStatus};
use serde::{Deserialize, Serialize};
use task_models::Task;
use task_responses::TaskResponse;
use utoipa::ToSchema;
use uuid::Uuid;

/// A project together with the tasks it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tasks: Vec<TaskResponse>,
    pub task_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn new(project: Project, tasks: Vec<Task>) -> Self {
        let tasks: Vec<TaskResponse> =
            tasks.into_iter().map(TaskResponse::from).collect();
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            task_count: tasks.len() as u64,
            tasks,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// List item: a project without its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectSummaryResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub items: Vec<ProjectSummaryResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl ProjectListResponse {
    pub fn new(page: Paged<Project>, pagination: Pagination) -> Self {
        let page = page.map(ProjectSummaryResponse::from);
        Self {
            items: page.items,
            total: page.total,
            page: pagination.page(),
            limit: pagination.limit(),
        }
    }
}

use chrono::{DateTime, Utc};
use dao_utils::{Paged, Pagination};
use serde::{Deserialize, Serialize};
use task_models::{Task, TaskPriority, TaskStatus};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<String>,
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            assignee: task.assignee,
            tags: task.tags,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub items: Vec<TaskResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl TaskListResponse {
    pub fn new(page: Paged<Task>, pagination: Pagination) -> Self {
        let page = page.map(TaskResponse::from);
        Self {
            items: page.items,
            total: page.total,
            page: pagination.page(),
            limit: pagination.limit(),
        }
    }
}

/// Tasks of one project, cached under the project relationship key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectTasksResponse {
    pub project_id: Uuid,
    pub project_name: String,
    pub tasks: Vec<TaskResponse>,
    pub total: u64,
}

impl ProjectTasksResponse {
    pub fn new(project_id: Uuid, project_name: String, tasks: Vec<Task>) -> Self {
        let tasks: Vec<TaskResponse> = tasks.into_iter().map(Into::into).collect();
        Self {
            project_id,
            project_name,
            total: tasks.len() as u64,
            tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedTasksResponse {
    pub project_id: Uuid,
    pub deleted: u64,
}

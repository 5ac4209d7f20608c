use dao_utils::Pagination;
use serde::Deserialize;
use task_models::{Task, TaskPriority, TaskStatus};
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct GetTaskQuery {
    pub task_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProjectTasksQuery {
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Page size, defaults to 20, at most 100
    pub limit: Option<u64>,
    pub project_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Exact assignee
    pub assignee: Option<String>,
    /// Tasks carrying this tag
    pub tag: Option<String>,
}

impl ListTasksQuery {
    pub fn pagination(&self) -> Pagination { Pagination::new(self.page, self.limit) }

    pub fn filters(&self) -> TaskFilters {
        TaskFilters {
            project_id: self.project_id,
            status: self.status,
            priority: self.priority,
            assignee: non_blank(self.assignee.as_deref()),
            tag: non_blank(self.tag.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub project_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub tag: Option<String>,
}

impl TaskFilters {
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.is_none_or(|id| id == task.project_id)
            && self.status.is_none_or(|status| status == task.status)
            && self.priority.is_none_or(|priority| priority == task.priority)
            && self
                .assignee
                .as_deref()
                .is_none_or(|assignee| task.assignee.as_deref() == Some(assignee))
            && self
                .tag
                .as_deref()
                .is_none_or(|tag| task.tags.iter().any(|t| t == tag))
    }
}

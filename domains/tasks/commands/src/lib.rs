use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use task_errors::TaskError;
use task_models::{Task, TaskPriority, TaskStatus};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskCommand {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskCommand {
    pub fn validated(self) -> Result<Self, TaskError> {
        Ok(Self {
            project_id: self.project_id,
            title: validate_title(&self.title)?,
            description: validate_description(self.description.as_deref())?,
            status: self.status,
            priority: self.priority,
            assignee: normalize_assignee(self.assignee.as_deref()),
            tags: normalize_tags(self.tags),
            due_date: self.due_date,
        })
    }

    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.project_id, self.title);
        task.description = self.description;
        task.status = self.status.unwrap_or_default();
        task.priority = self.priority.unwrap_or_default();
        task.assignee = self.assignee;
        task.tags = self.tags;
        task.due_date = self.due_date;
        task
    }
}

/// Partial update. Absent fields stay as they are; an empty description or
/// assignee clears it. Tasks never move between projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskCommand {
    #[serde(skip)]
    pub task_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskCommand {
    pub fn validated(self) -> Result<Self, TaskError> {
        let description = match self.description.as_deref() {
            Some(description) => {
                Some(validate_description(Some(description))?.unwrap_or_default())
            }
            None => None,
        };
        Ok(Self {
            task_id: self.task_id,
            title: self.title.as_deref().map(validate_title).transpose()?,
            description,
            status: self.status,
            priority: self.priority,
            assignee: self
                .assignee
                .as_deref()
                .map(|assignee| normalize_assignee(Some(assignee)).unwrap_or_default()),
            tags: self.tags.map(normalize_tags),
            due_date: self.due_date,
        })
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = (!description.is_empty()).then(|| description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = (!assignee.is_empty()).then(|| assignee.clone());
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteTaskCommand {
    pub task_id: Uuid,
}

/// Delete every task owned by a project.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteProjectTasksCommand {
    pub project_id: Uuid,
}

fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(
    description: Option<&str>,
) -> Result<Option<String>, TaskError> {
    let Some(description) = description.map(str::trim) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TaskError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok((!description.is_empty()).then(|| description.to_string()))
}

fn normalize_assignee(assignee: Option<&str>) -> Option<String> {
    assignee
        .map(str::trim)
        .filter(|assignee| !assignee.is_empty())
        .map(str::to_string)
}

/// Trim tags, drop empty ones and keep the first of any duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|seen| seen == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

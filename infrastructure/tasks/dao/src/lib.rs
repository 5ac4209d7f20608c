use async_trait::async_trait;
use dao_utils::{Paged, Pagination, WhereBuilder};
use sql_connection::SqlConnect;
use task_commands::UpdateTaskCommand;
use task_errors::TaskError;
use task_models::{Task, TaskPriority, TaskStatus};
use task_queries::TaskFilters;
use tokio_postgres::Row;
use tracing::instrument;
use uuid::Uuid;

/// Requires the `projects` table.
pub const TASKS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          UUID PRIMARY KEY,
    project_id  UUID NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL DEFAULT 'todo',
    priority    TEXT NOT NULL DEFAULT 'medium',
    assignee    TEXT,
    tags        TEXT[] NOT NULL DEFAULT '{}',
    due_date    TIMESTAMPTZ,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS tasks_project_id_idx ON tasks (project_id);
CREATE INDEX IF NOT EXISTS tasks_created_at_idx ON tasks (created_at DESC);
";

const TASK_COLUMNS: &str = "id, project_id, title, description, status, \
                            priority, assignee, tags, due_date, created_at, \
                            updated_at";

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError>;

    async fn save(&self, task: &Task) -> Result<Task, TaskError>;

    async fn update(
        &self, command: &UpdateTaskCommand,
    ) -> Result<Option<Task>, TaskError>;

    async fn delete(&self, id: Uuid) -> Result<bool, TaskError>;

    /// Newest first.
    async fn find_all(
        &self, filters: &TaskFilters, pagination: Pagination,
    ) -> Result<Paged<Task>, TaskError>;

    /// All tasks of a project in creation order.
    async fn find_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Task>, TaskError>;

    /// Delete all tasks of a project, returning the ids that were removed.
    async fn delete_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Uuid>, TaskError>;
}

#[derive(Clone)]
pub struct TaskDao {
    db: SqlConnect,
}

impl TaskDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    pub fn db(&self) -> &SqlConnect { &self.db }

    fn map_row(row: &Row) -> Result<Task, TaskError> {
        let status: String = row.try_get("status")?;
        let priority: String = row.try_get("priority")?;
        Ok(Task {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: status.parse::<TaskStatus>().map_err(TaskError::Internal)?,
            priority: priority
                .parse::<TaskPriority>()
                .map_err(TaskError::Internal)?,
            assignee: row.try_get("assignee")?,
            tags: row.try_get("tags")?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn map_rows(rows: &[Row]) -> Result<Vec<Task>, TaskError> {
        rows.iter().map(Self::map_row).collect()
    }
}

#[async_trait]
impl TaskRepository for TaskDao {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .await?;
        let row = client.query_opt(&stmt, &[&id]).await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip_all, fields(task.id = %task.id, project.id = %task.project_id))]
    async fn save(&self, task: &Task) -> Result<Task, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                 RETURNING {TASK_COLUMNS}"
            ))
            .await?;
        let row = client
            .query_one(
                &stmt,
                &[
                    &task.id,
                    &task.project_id,
                    &task.title,
                    &task.description,
                    &task.status.as_str(),
                    &task.priority.as_str(),
                    &task.assignee,
                    &task.tags,
                    &task.due_date,
                    &task.created_at,
                    &task.updated_at,
                ],
            )
            .await?;

        Self::map_row(&row)
    }

    #[instrument(skip_all, fields(task.id = %command.task_id))]
    async fn update(
        &self, command: &UpdateTaskCommand,
    ) -> Result<Option<Task>, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "UPDATE tasks SET
                     title = COALESCE($2, title),
                     description = CASE WHEN $3::TEXT IS NULL THEN description
                                        ELSE NULLIF($3, '') END,
                     status = COALESCE($4, status),
                     priority = COALESCE($5, priority),
                     assignee = CASE WHEN $6::TEXT IS NULL THEN assignee
                                     ELSE NULLIF($6, '') END,
                     tags = COALESCE($7, tags),
                     due_date = COALESCE($8, due_date),
                     updated_at = $9
                 WHERE id = $1
                 RETURNING {TASK_COLUMNS}"
            ))
            .await?;
        let row = client
            .query_opt(
                &stmt,
                &[
                    &command.task_id,
                    &command.title,
                    &command.description,
                    &command.status.map(|status| status.as_str()),
                    &command.priority.map(|priority| priority.as_str()),
                    &command.assignee,
                    &command.tags,
                    &command.due_date,
                    &chrono::Utc::now(),
                ],
            )
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client.prepare_cached("DELETE FROM tasks WHERE id = $1").await?;
        let affected = client.execute(&stmt, &[&id]).await?;

        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn find_all(
        &self, filters: &TaskFilters, pagination: Pagination,
    ) -> Result<Paged<Task>, TaskError> {
        let client = self.db.get_client().await?;

        let mut conditions = WhereBuilder::new();
        conditions
            .eq("project_id", filters.project_id)
            .eq("status", filters.status.map(|status| status.as_str()))
            .eq("priority", filters.priority.map(|priority| priority.as_str()))
            .eq("assignee", filters.assignee.clone());
        if let Some(tag) = &filters.tag {
            conditions.condition("{} = ANY(tags)", tag.clone());
        }
        let where_clause = conditions.clause();

        let total: i64 = client
            .query_one(
                &format!("SELECT COUNT(*) FROM tasks{where_clause}"),
                &conditions.params(),
            )
            .await?
            .try_get(0)?;

        let limit = conditions.bind(i64::try_from(pagination.limit()).unwrap_or(i64::MAX));
        let offset =
            conditions.bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));
        let rows = client
            .query(
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks{where_clause}
                     ORDER BY created_at DESC, id DESC
                     LIMIT {limit} OFFSET {offset}"
                ),
                &conditions.params(),
            )
            .await?;

        Ok(Paged {
            items: Self::map_rows(&rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    #[instrument(skip(self))]
    async fn find_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Task>, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1
                 ORDER BY created_at ASC, id ASC"
            ))
            .await?;
        let rows = client.query(&stmt, &[&project_id]).await?;

        Self::map_rows(&rows)
    }

    #[instrument(skip(self))]
    async fn delete_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Uuid>, TaskError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached("DELETE FROM tasks WHERE project_id = $1 RETURNING id")
            .await?;
        let rows = client.query(&stmt, &[&project_id]).await?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(TaskError::from))
            .collect()
    }
}

use async_trait::async_trait;
use dao_utils::{Paged, Pagination, WhereBuilder, query_helpers::escape_like};
use project_commands::UpdateProjectCommand;
use project_errors::ProjectError;
use project_models::{Project, ProjectStatus};
use project_queries::ProjectFilters;
use sql_connection::SqlConnect;
use tokio_postgres::Row;
use tracing::instrument;
use uuid::Uuid;

pub const PROJECTS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL DEFAULT 'active',
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS projects_created_at_idx ON projects (created_at DESC);
";

const PROJECT_COLUMNS: &str =
    "id, name, description, status, created_at, updated_at";

/// System of record for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, ProjectError>;

    async fn save(&self, project: &Project) -> Result<Project, ProjectError>;

    /// Apply `command`, returning the updated project or `None` when it does
    /// not exist.
    async fn update(
        &self, command: &UpdateProjectCommand,
    ) -> Result<Option<Project>, ProjectError>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ProjectError>;

    /// Newest first.
    async fn find_all(
        &self, filters: &ProjectFilters, pagination: Pagination,
    ) -> Result<Paged<Project>, ProjectError>;
}

#[derive(Clone)]
pub struct ProjectDao {
    db: SqlConnect,
}

impl ProjectDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    pub fn db(&self) -> &SqlConnect { &self.db }

    fn map_row(row: &Row) -> Result<Project, ProjectError> {
        let status: String = row.try_get("status")?;
        Ok(Project {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status: status
                .parse::<ProjectStatus>()
                .map_err(ProjectError::Internal)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl ProjectRepository for ProjectDao {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, ProjectError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
            ))
            .await?;
        let row = client.query_opt(&stmt, &[&id]).await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip_all, fields(project.id = %project.id))]
    async fn save(&self, project: &Project) -> Result<Project, ProjectError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO projects ({PROJECT_COLUMNS})
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {PROJECT_COLUMNS}"
            ))
            .await?;
        let row = client
            .query_one(
                &stmt,
                &[
                    &project.id,
                    &project.name,
                    &project.description,
                    &project.status.as_str(),
                    &project.created_at,
                    &project.updated_at,
                ],
            )
            .await?;

        Self::map_row(&row)
    }

    #[instrument(skip_all, fields(project.id = %command.project_id))]
    async fn update(
        &self, command: &UpdateProjectCommand,
    ) -> Result<Option<Project>, ProjectError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "UPDATE projects SET
                     name = COALESCE($2, name),
                     description = CASE WHEN $3::TEXT IS NULL THEN description
                                        ELSE NULLIF($3, '') END,
                     status = COALESCE($4, status),
                     updated_at = $5
                 WHERE id = $1
                 RETURNING {PROJECT_COLUMNS}"
            ))
            .await?;
        let row = client
            .query_opt(
                &stmt,
                &[
                    &command.project_id,
                    &command.name,
                    &command.description,
                    &command.status.map(|status| status.as_str()),
                    &chrono::Utc::now(),
                ],
            )
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool, ProjectError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached("DELETE FROM projects WHERE id = $1")
            .await?;
        let affected = client.execute(&stmt, &[&id]).await?;

        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn find_all(
        &self, filters: &ProjectFilters, pagination: Pagination,
    ) -> Result<Paged<Project>, ProjectError> {
        let client = self.db.get_client().await?;

        let mut conditions = WhereBuilder::new();
        conditions.eq("status", filters.status.map(|status| status.as_str()));
        if let Some(name) = &filters.name {
            conditions.condition("name ILIKE {}", format!("%{}%", escape_like(name)));
        }
        let where_clause = conditions.clause();

        let total: i64 = client
            .query_one(
                &format!("SELECT COUNT(*) FROM projects{where_clause}"),
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
                    "SELECT {PROJECT_COLUMNS} FROM projects{where_clause}
                     ORDER BY created_at DESC, id DESC
                     LIMIT {limit} OFFSET {offset}"
                ),
                &conditions.params(),
            )
            .await?;

        Ok(Paged {
            items: rows.iter().map(Self::map_row).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

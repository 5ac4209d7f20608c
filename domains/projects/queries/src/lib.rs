use dao_utils::Pagination;
use project_models::{Project, ProjectStatus};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct GetProjectQuery {
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProjectsQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Page size, defaults to 20, at most 100
    pub limit: Option<u64>,
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring of the project name
    pub name: Option<String>,
}

impl ListProjectsQuery {
    pub fn pagination(&self) -> Pagination { Pagination::new(self.page, self.limit) }

    pub fn filters(&self) -> ProjectFilters {
        ProjectFilters {
            status: self.status,
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilters {
    pub status: Option<ProjectStatus>,
    pub name: Option<String>,
}

impl ProjectFilters {
    pub fn matches(&self, project: &Project) -> bool {
        if self.status.is_some_and(|status| status != project.status) {
            return false;
        }
        match &self.name {
            Some(needle) => {
                project
                    .name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_parsing() {
        let query: ListProjectsQuery = serde_json::from_str(
            r#"{"page":2,"limit":500,"status":"archived","name":"  road "}"#,
        )
        .unwrap();

        assert_eq!(query.pagination(), Pagination::new(Some(2), Some(100)));
        assert_eq!(
            query.filters(),
            ProjectFilters {
                status: Some(ProjectStatus::Archived),
                name: Some("road".into()),
            }
        );
    }

    #[test]
    fn test_blank_name_is_no_filter() {
        let query = ListProjectsQuery {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.filters(), ProjectFilters::default());
    }

    #[test]
    fn test_matches() {
        let project = Project::new("Website Redesign".into(), None);

        assert!(ProjectFilters::default().matches(&project));
        assert!(
            ProjectFilters {
                name: Some("redes".into()),
                ..Default::default()
            }
            .matches(&project)
        );
        assert!(
            !ProjectFilters {
                status: Some(ProjectStatus::Archived),
                ..Default::default()
            }
            .matches(&project)
        );
    }
}

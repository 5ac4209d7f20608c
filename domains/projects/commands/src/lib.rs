use project_errors::ProjectError;
use project_models::{Project, ProjectStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectCommand {
    pub name: String,
    pub description: Option<String>,
}

impl CreateProjectCommand {
    /// Trimmed copy of the command, or the first rule it breaks.
    pub fn validated(self) -> Result<Self, ProjectError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            description: validate_description(self.description)?,
        })
    }
}

/// Partial update; absent fields are left untouched and an empty
/// description clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProjectCommand {
    #[serde(skip)]
    pub project_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl UpdateProjectCommand {
    pub fn validated(self) -> Result<Self, ProjectError> {
        Ok(Self {
            project_id: self.project_id,
            name: self.name.as_deref().map(validate_name).transpose()?,
            description: match self.description {
                Some(description) => {
                    Some(validate_description(Some(description))?.unwrap_or_default())
                }
                None => None,
            },
            status: self.status,
        })
    }

    /// Apply the present fields to `project`, bumping `updated_at`.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description =
                (!description.is_empty()).then(|| description.clone());
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        project.updated_at = chrono::Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteProjectCommand {
    pub project_id: Uuid,
}

fn validate_name(name: &str) -> Result<String, ProjectError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProjectError::Validation("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ProjectError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_description(
    description: Option<String>,
) -> Result<Option<String>, ProjectError> {
    let Some(description) = description else {
        return Ok(None);
    };
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ProjectError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok((!description.is_empty()).then(|| description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_fields() {
        let command = CreateProjectCommand {
            name: "  Roadmap  ".into(),
            description: Some("  ".into()),
        }
        .validated()
        .unwrap();

        assert_eq!(command.name, "Roadmap");
        assert_eq!(command.description, None);
    }

    #[test]
    fn test_create_rejects_blank_and_long_names() {
        let blank = CreateProjectCommand {
            name: "   ".into(),
            description: None,
        };
        assert!(matches!(blank.validated(), Err(ProjectError::Validation(_))));

        let long = CreateProjectCommand {
            name: "x".repeat(MAX_NAME_LEN + 1),
            description: None,
        };
        assert!(matches!(long.validated(), Err(ProjectError::Validation(_))));
    }

    #[test]
    fn test_update_empty_description_clears() {
        let command = UpdateProjectCommand {
            description: Some(" ".into()),
            ..Default::default()
        }
        .validated()
        .unwrap();

        assert_eq!(command.description.as_deref(), Some(""));
        assert_eq!(command.name, None);
    }

    #[test]
    fn test_apply_to_changes_only_present_fields() {
        let mut project = Project::new("Old".into(), Some("keep".into()));
        let before = project.updated_at;
        UpdateProjectCommand {
            status: Some(ProjectStatus::Archived),
            ..Default::default()
        }
        .apply_to(&mut project);

        assert_eq!(project.name, "Old");
        assert_eq!(project.description.as_deref(), Some("keep"));
        assert_eq!(project.status, ProjectStatus::Archived);
        assert!(project.updated_at >= before);

        UpdateProjectCommand {
            description: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut project);
        assert_eq!(project.description, None);
    }

    #[test]
    fn test_update_rejects_long_description() {
        let command = UpdateProjectCommand {
            description: Some("d".repeat(MAX_DESCRIPTION_LEN + 1)),
            ..Default::default()
        };
        assert!(command.validated().is_err());
    }

    #[test]
    fn test_update_body_ignores_id() {
        let command: UpdateProjectCommand = serde_json::from_str(
            r#"{"name":"New","status":"archived"}"#,
        )
        .unwrap();

        assert_eq!(command.project_id, Uuid::nil());
        assert_eq!(command.status, Some(ProjectStatus::Archived));
    }
}

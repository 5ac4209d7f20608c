use project_commands::CreateProjectCommand;
use project_models::Project;
use task_commands::CreateTaskCommand;
use task_models::Task;
use uuid::Uuid;

pub fn project_named(name: &str) -> Project {
    Project::new(name.to_string(), Some(format!("{name} description")))
}

pub fn task_for(project_id: Uuid, title: &str) -> Task {
    Task::new(project_id, title.to_string())
}

pub fn create_project_command(name: &str) -> CreateProjectCommand {
    CreateProjectCommand {
        name: name.to_string(),
        description: None,
    }
}

pub fn create_task_command(project_id: Uuid, title: &str) -> CreateTaskCommand {
    CreateTaskCommand {
        project_id,
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        assignee: None,
        tags: Vec::new(),
        due_date: None,
    }
}

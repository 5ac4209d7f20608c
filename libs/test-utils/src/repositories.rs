use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use dao_utils::{Paged, Pagination};
use project_commands::UpdateProjectCommand;
use project_dao::ProjectRepository;
use project_errors::ProjectError;
use project_models::Project;
use project_queries::ProjectFilters;
use task_commands::UpdateTaskCommand;
use task_dao::TaskRepository;
use task_errors::TaskError;
use task_models::Task;
use task_queries::TaskFilters;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-operation call counters plus the set of operations told to fail.
#[derive(Debug, Default)]
pub struct CallLog {
    counts: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl CallLog {
    /// Count a call to `op`; `true` when `op` should fail.
    fn record(&self, op: &'static str) -> bool {
        *lock(&self.counts).entry(op).or_default() += 1;
        lock(&self.failing).contains(op)
    }

    pub fn count(&self, op: &str) -> usize {
        lock(&self.counts).get(op).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize { lock(&self.counts).values().sum() }

    pub fn reset(&self) { lock(&self.counts).clear() }

    /// Make every later call to `op` fail until [`CallLog::heal`].
    pub fn fail_on(&self, op: &'static str) { lock(&self.failing).insert(op); }

    pub fn heal(&self) { lock(&self.failing).clear() }
}

/// Call-counting [`ProjectRepository`] over a map.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<BTreeMap<Uuid, Project>>,
    pub calls: CallLog,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self { Self::default() }

    /// Seed a project without counting a call.
    pub fn insert(&self, project: Project) {
        lock(&self.projects).insert(project.id, project);
    }

    pub fn contains(&self, id: Uuid) -> bool { lock(&self.projects).contains_key(&id) }

    /// Stored copy of a project, bypassing the call log.
    pub fn get(&self, id: Uuid) -> Option<Project> { lock(&self.projects).get(&id).cloned() }

    fn check(&self, op: &'static str) -> Result<(), ProjectError> {
        if self.calls.record(op) {
            return Err(ProjectError::Internal(format!("injected {op} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, ProjectError> {
        self.check("find_by_id")?;
        Ok(lock(&self.projects).get(&id).cloned())
    }

    async fn save(&self, project: &Project) -> Result<Project, ProjectError> {
        self.check("save")?;
        lock(&self.projects).insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn update(
        &self, command: &UpdateProjectCommand,
    ) -> Result<Option<Project>, ProjectError> {
        self.check("update")?;
        let mut projects = lock(&self.projects);
        Ok(projects.get_mut(&command.project_id).map(|project| {
            command.apply_to(project);
            project.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ProjectError> {
        self.check("delete")?;
        Ok(lock(&self.projects).remove(&id).is_some())
    }

    async fn find_all(
        &self, filters: &ProjectFilters, pagination: Pagination,
    ) -> Result<Paged<Project>, ProjectError> {
        self.check("find_all")?;
        let mut matching: Vec<Project> = lock(&self.projects)
            .values()
            .filter(|project| filters.matches(project))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(pagination.slice(matching))
    }
}

/// Call-counting [`TaskRepository`] over a map.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<BTreeMap<Uuid, Task>>,
    pub calls: CallLog,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self { Self::default() }

    /// Seed a task without counting a call.
    pub fn insert(&self, task: Task) { lock(&self.tasks).insert(task.id, task); }

    pub fn contains(&self, id: Uuid) -> bool { lock(&self.tasks).contains_key(&id) }

    fn check(&self, op: &'static str) -> Result<(), TaskError> {
        if self.calls.record(op) {
            return Err(TaskError::Internal(format!("injected {op} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError> {
        self.check("find_by_id")?;
        Ok(lock(&self.tasks).get(&id).cloned())
    }

    async fn save(&self, task: &Task) -> Result<Task, TaskError> {
        self.check("save")?;
        lock(&self.tasks).insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn update(
        &self, command: &UpdateTaskCommand,
    ) -> Result<Option<Task>, TaskError> {
        self.check("update")?;
        let mut tasks = lock(&self.tasks);
        Ok(tasks.get_mut(&command.task_id).map(|task| {
            command.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TaskError> {
        self.check("delete")?;
        Ok(lock(&self.tasks).remove(&id).is_some())
    }

    async fn find_all(
        &self, filters: &TaskFilters, pagination: Pagination,
    ) -> Result<Paged<Task>, TaskError> {
        self.check("find_all")?;
        let mut matching: Vec<Task> = lock(&self.tasks)
            .values()
            .filter(|task| filters.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(pagination.slice(matching))
    }

    async fn find_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Task>, TaskError> {
        self.check("find_by_project_id")?;
        let mut owned: Vec<Task> = lock(&self.tasks)
            .values()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(owned)
    }

    async fn delete_by_project_id(
        &self, project_id: Uuid,
    ) -> Result<Vec<Uuid>, TaskError> {
        self.check("delete_by_project_id")?;
        let mut tasks = lock(&self.tasks);
        let owned: Vec<Uuid> = tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .map(|task| task.id)
            .collect();
        for id in &owned {
            tasks.remove(id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{project_named, task_for};

    #[tokio::test]
    async fn test_counts_and_failure_injection() {
        let repo = InMemoryProjectRepository::new();
        let project = project_named("Counted");
        repo.insert(project.clone());

        assert!(repo.find_by_id(project.id).await.unwrap().is_some());
        assert_eq!(repo.calls.count("find_by_id"), 1);

        repo.calls.fail_on("find_by_id");
        assert!(repo.find_by_id(project.id).await.is_err());
        repo.calls.heal();
        assert!(repo.find_by_id(project.id).await.is_ok());
        assert_eq!(repo.calls.count("find_by_id"), 3);
        assert_eq!(repo.calls.total(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_project_only_touches_owned_tasks() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::now_v7();
        let other = Uuid::now_v7();
        let owned = task_for(owner, "mine");
        let foreign = task_for(other, "theirs");
        repo.insert(owned.clone());
        repo.insert(foreign.clone());

        let deleted = repo.delete_by_project_id(owner).await.unwrap();

        assert_eq!(deleted, vec![owned.id]);
        assert!(repo.contains(foreign.id));
    }
}

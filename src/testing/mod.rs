//! In-memory doubles for router tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::database::models::{Project, ProjectMember, Task, User};
use crate::database::{
    DatabaseError, NewProject, NewTask, NewUser, Page, ProjectChanges, ProjectStore, Store, TaskChanges,
    TaskStore, UserChanges, UserStore,
};
use crate::queue::{EmailJob, EmailQueue, QueueError};
use crate::types::{Role, TaskStatus};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    members: Vec<ProjectMember>,
    tasks: Vec<Task>,
}

/// Store backed by vectors; insertion order stands in for `created_at`
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

fn not_found(what: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", what))
}

fn window<T: Clone>(rows: impl DoubleEndedIterator<Item = T>, page: Page) -> Vec<T> {
    rows.rev()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit as usize)
        .collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with a real argon2 hash of `password`
    /// Make `ping` fail as if the database were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        self.create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role,
        })
        .await
        .unwrap()
    }

    pub async fn seed_project(&self, title: &str, owner_id: Uuid) -> Project {
        self.create_project(NewProject {
            title: title.to_string(),
            description: None,
            owner_id,
        })
        .await
        .unwrap()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password: new.password_hash,
            role: new.role,
            image: None,
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::DuplicateEmail);
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = changes.email.as_deref() {
            if tables.users.iter().any(|u| u.id != id && u.email == email) {
                return Err(DatabaseError::DuplicateEmail);
            }
        }
        let user = tables.users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found("User"))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(image) = changes.image {
            user.image = Some(image);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn count_users(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.users.len() as i64)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, new: NewProject) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        Ok(self.tables.read().await.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self, page: Page) -> Result<Vec<Project>, DatabaseError> {
        Ok(window(self.tables.read().await.projects.iter().cloned(), page))
    }

    async fn count_projects(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.projects.len() as i64)
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .rev()
            .filter(|p| {
                p.owner_id == user_id
                    || tables.members.iter().any(|m| m.project_id == p.id && m.user_id == user_id)
            })
            .cloned()
            .collect())
    }

    async fn member_projects(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| tables.projects.iter().find(|p| p.id == m.project_id).cloned())
            .collect())
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError> {
        let mut tables = self.tables.write().await;
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Project"))?;
        if let Some(title) = changes.title {
            project.title = title;
        }
        if let Some(description) = changes.description {
            project.description = Some(description);
        }
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Err(not_found("Project"));
        }
        tables.members.retain(|m| m.project_id != id);
        tables.tasks.retain(|t| t.project_id != id);
        Ok(())
    }

    async fn add_members(&self, project_id: Uuid, user_ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let mut added = 0;
        for user_id in user_ids {
            let exists = tables
                .members
                .iter()
                .any(|m| m.project_id == project_id && m.user_id == *user_id);
            if !exists {
                tables.members.push(ProjectMember {
                    id: Uuid::new_v4(),
                    project_id,
                    user_id: *user_id,
                    role: None,
                    created_at: Utc::now(),
                });
                added += 1;
            }
        }
        Ok(added)
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, new: NewTask) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            status: TaskStatus::default(),
            priority: new.priority,
            project_id: new.project_id,
            created_by: new.created_by,
            assigned_to: new.assigned_to,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        Ok(self.tables.read().await.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, page: Page) -> Result<Vec<Task>, DatabaseError> {
        Ok(window(self.tables.read().await.tasks.iter().cloned(), page))
    }

    async fn count_tasks(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.tasks.len() as i64)
    }

    async fn tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .tasks
            .iter()
            .rev()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError> {
        let mut tables = self.tables.write().await;
        let task = tables.tasks.iter_mut().find(|t| t.id == id).ok_or_else(|| not_found("Task"))?;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(assignee) = changes.assigned_to {
            task.assigned_to = Some(assignee);
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn set_task_assignee(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Task, DatabaseError> {
        let mut tables = self.tables.write().await;
        let task = tables.tasks.iter_mut().find(|t| t.id == id).ok_or_else(|| not_found("Task"))?;
        task.assigned_to = assignee;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Err(not_found("Task"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// Queue that records jobs instead of sending them
#[derive(Default)]
pub struct FakeQueue {
    pub jobs: Mutex<Vec<EmailJob>>,
    pub fail: bool,
}

impl FakeQueue {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl EmailQueue for FakeQueue {
    async fn enqueue(&self, job: EmailJob) -> Result<(), QueueError> {
        if self.fail {
            return Err(QueueError::Connection("queue offline".into()));
        }
        self.jobs.lock().await.push(job);
        Ok(())
    }
}

//! Persistence contracts consumed by the handlers.
//!
//! The production implementation is [`super::PgStore`]; lookups return
//! `Ok(None)` for absent rows, while mutations of absent rows fail with
//! [`DatabaseError::NotFound`].

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{Project, ProjectMember, Task, User};
use super::DatabaseError;
use crate::types::{Priority, Role, TaskStatus};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Uuid>,
}

/// 1-based page window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Rows to skip, saturating at `i64::MAX` so it always binds as a valid
    /// SQL OFFSET
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)).saturating_mul(i64::from(self.limit))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn count_users(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, new: NewProject) -> Result<Project, DatabaseError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;
    /// Newest first
    async fn list_projects(&self, page: Page) -> Result<Vec<Project>, DatabaseError>;
    async fn count_projects(&self) -> Result<i64, DatabaseError>;
    /// Projects the user owns or belongs to, newest first
    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError>;
    /// Projects the user was assigned to as a member (ownership excluded)
    async fn member_projects(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError>;
    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError>;
    /// Also removes the project's tasks and memberships
    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError>;
    /// Existing memberships are skipped; returns how many were added
    async fn add_members(&self, project_id: Uuid, user_ids: &[Uuid]) -> Result<u64, DatabaseError>;
    /// Oldest membership first
    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, DatabaseError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, new: NewTask) -> Result<Task, DatabaseError>;
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    /// Newest first
    async fn list_tasks(&self, page: Page) -> Result<Vec<Task>, DatabaseError>;
    async fn count_tasks(&self) -> Result<i64, DatabaseError>;
    /// Newest first
    async fn tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError>;
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError>;
    /// `None` clears the assignment
    async fn set_task_assignee(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Task, DatabaseError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// Everything the API needs from persistence
#[async_trait]
pub trait Store: UserStore + ProjectStore + TaskStore {
    /// Round-trip to the backing database
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets() {
        assert_eq!(Page { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Page { page: 3, limit: 10 }.offset(), 20);
        assert_eq!(Page { page: 0, limit: 10 }.offset(), 0);
    }

    #[test]
    fn huge_pages_never_go_negative() {
        let page = Page { page: u32::MAX, limit: u32::MAX };
        assert_eq!(page.offset(), i64::MAX);
        assert_eq!(Page { page: u32::MAX, limit: 100 }.offset(), (u32::MAX as i64 - 1) * 100);
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Project, ProjectMember, Task, User};
use super::store::{
    NewProject, NewTask, NewUser, Page, ProjectChanges, ProjectStore, Store, TaskChanges, TaskStore,
    UserChanges, UserStore,
};
use super::DatabaseError;

const USER_COLUMNS: &str = "id, name, email, password, role, image, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, title, description, owner_id, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, priority, project_id, created_by, assigned_to, created_at, updated_at";

/// PostgreSQL-backed credential store (schema in `sql/schema.sql`)
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(what: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", what))
}

/// Unique violations on `users` can only come from the email index
fn user_write_error(err: sqlx::Error) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::DuplicateEmail,
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await
        .map_err(user_write_error)?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                image = COALESCE($4, image),
                updated_at = now()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.image)
        .fetch_optional(&self.pool)
        .await
        .map_err(user_write_error)?
        .ok_or_else(|| not_found("User"))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count_users(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, new: NewProject) -> Result<Project, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (id, title, description, owner_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_projects(&self, page: Page) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            PROJECT_COLUMNS
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn count_projects(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects p
             WHERE p.owner_id = $1
                OR EXISTS (SELECT 1 FROM project_members m WHERE m.project_id = p.id AND m.user_id = $1)
             ORDER BY p.created_at DESC",
            PROJECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn member_projects(&self, user_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT p.id, p.title, p.description, p.owner_id, p.created_at, p.updated_at
             FROM projects p
             JOIN project_members m ON m.project_id = p.id
             WHERE m.user_id = $1
             ORDER BY m.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError> {
        sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = now()
             WHERE id = $1
             RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Project"))
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        // tasks and project_members cascade via foreign keys
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Project"));
        }
        Ok(())
    }

    async fn add_members(&self, project_id: Uuid, user_ids: &[Uuid]) -> Result<u64, DatabaseError> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             SELECT $1, u FROM UNNEST($2::uuid[]) AS u
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(user_ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, DatabaseError> {
        let members = sqlx::query_as::<_, ProjectMember>(
            "SELECT id, project_id, user_id, role, created_at
             FROM project_members WHERE project_id = $1
             ORDER BY created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, new: NewTask) -> Result<Task, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, priority, project_id, created_by, assigned_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.priority)
        .bind(new.project_id)
        .bind(new.created_by)
        .bind(new.assigned_to)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks(&self, page: Page) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            TASK_COLUMNS
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn count_tasks(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                assigned_to = COALESCE($6, assigned_to),
                updated_at = now()
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.assigned_to)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Task"))
    }

    async fn set_task_assignee(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Task, DatabaseError> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET assigned_to = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(assignee)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Task"))
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Task"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

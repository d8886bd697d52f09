use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::database::models::{ProjectSummary, User};
use crate::database::{DatabaseError, NewUser, ProjectStore, Store, UserChanges, UserStore};
use crate::error::{ApiError, ApiResult};
use crate::types::Role;

#[derive(Debug, Clone, Serialize)]
pub struct UserWithProjects {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub projects: Vec<ProjectSummary>,
}

/// Profile fields a user may change on themselves; empty strings count as absent
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn register(&self, name: String, email: String, password: String, role: Role) -> ApiResult<User> {
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::bad_request("User already exists"));
        }

        let password_hash = hash_password_blocking(password).await?;
        // a concurrent signup can still win the unique index
        let user = self
            .store
            .create_user(NewUser {
                name,
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::DuplicateEmail => ApiError::bad_request("User already exists"),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<User> {
        let invalid = || ApiError::bad_request("Invalid credentials");

        let user = self.store.find_user_by_email(email).await?.ok_or_else(invalid)?;
        if !verify_password_blocking(user.password.clone(), password.to_string()).await {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> ApiResult<User> {
        self.get(id).await?;

        let email = present(update.email);
        if let Some(email) = email.as_deref() {
            if let Some(other) = self.store.find_user_by_email(email).await? {
                if other.id != id {
                    return Err(ApiError::bad_request("Email already in use by another user"));
                }
            }
        }

        let changes = UserChanges {
            name: present(update.name),
            email,
            image: present(update.image),
        };
        self.store.update_user(id, changes).await.map_err(|e| match e {
            DatabaseError::DuplicateEmail => ApiError::bad_request("Email already in use by another user"),
            other => other.into(),
        })
    }

    pub async fn list_with_projects(&self) -> ApiResult<Vec<UserWithProjects>> {
        let users = self.store.list_users().await?;
        let mut out = Vec::with_capacity(users.len());
        for user in users {
            let projects = self.store.member_projects(user.id).await?;
            out.push(UserWithProjects {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                projects: projects.iter().map(ProjectSummary::from).collect(),
            });
        }
        Ok(out)
    }

    pub async fn count(&self) -> ApiResult<i64> {
        Ok(self.store.count_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ProjectStore;
    use crate::testing::MemoryStore;
    use axum::http::StatusCode;

    fn service() -> (Arc<MemoryStore>, UserService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), UserService::new(store))
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_, users) = service();
        users
            .register("A".into(), "a@example.com".into(), "secret1".into(), Role::User)
            .await
            .unwrap();
        let err = users
            .register("B".into(), "a@example.com".into(), "secret2".into(), Role::User)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "User already exists");
    }

    #[tokio::test]
    async fn concurrent_signups_with_one_email_yield_one_account() {
        let (store, users) = service();
        let (first, second) = tokio::join!(
            users.register("A".into(), "race@example.com".into(), "secret1".into(), Role::User),
            users.register("B".into(), "race@example.com".into(), "secret2".into(), Role::User),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.into_iter().find_map(|r| r.err()).unwrap();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "User already exists");
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn store_rejects_duplicate_emails() {
        let store = MemoryStore::new();
        let new = || NewUser {
            name: "A".into(),
            email: "a@example.com".into(),
            password_hash: "x".into(),
            role: Role::User,
        };
        store.create_user(new()).await.unwrap();
        assert!(matches!(store.create_user(new()).await, Err(DatabaseError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn authenticate_hides_which_part_was_wrong() {
        let (store, users) = service();
        store.seed_user("A", "a@example.com", "secret1", Role::User).await;

        assert!(users.authenticate("a@example.com", "secret1").await.is_ok());
        for (email, password) in [("a@example.com", "nope"), ("b@example.com", "secret1")] {
            let err = users.authenticate(email, password).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.message(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn profile_email_conflicts() {
        let (store, users) = service();
        let a = store.seed_user("A", "a@example.com", "secret1", Role::User).await;
        store.seed_user("B", "b@example.com", "secret1", Role::User).await;

        let err = users
            .update_profile(
                a.id,
                ProfileUpdate {
                    email: Some("b@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Email already in use by another user");

        // Re-submitting your own email is fine; blank fields are ignored
        let updated = users
            .update_profile(
                a.id,
                ProfileUpdate {
                    name: Some("".into()),
                    email: Some("a@example.com".into()),
                    image: Some("https://img/a.png".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "A");
        assert_eq!(updated.image.as_deref(), Some("https://img/a.png"));
    }

    #[tokio::test]
    async fn lists_member_projects_per_user() {
        let (store, users) = service();
        let admin = store.seed_user("Root", "root@example.com", "secret1", Role::Admin).await;
        let member = store.seed_user("M", "m@example.com", "secret1", Role::User).await;
        let project = store.seed_project("Apollo", admin.id).await;
        store.add_members(project.id, &[member.id]).await.unwrap();

        let listed = users.list_with_projects().await.unwrap();
        let m = listed.iter().find(|u| u.id == member.id).unwrap();
        assert_eq!(m.projects.len(), 1);
        assert_eq!(m.projects[0].title, "Apollo");
        let root = listed.iter().find(|u| u.id == admin.id).unwrap();
        assert!(root.projects.is_empty());
    }
}

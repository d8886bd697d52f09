use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Project, UserSummary};
use crate::database::{Page, ProjectStore, Store, UserStore};
use crate::error::{ApiError, ApiResult};

/// Project row with its owner embedded
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithOwner {
    #[serde(flatten)]
    pub project: Project,
    pub owner: Option<UserSummary>,
}

/// Entry of a project's member listing
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

const OWNER_ROLE: &str = "Owner";
const DEFAULT_MEMBER_ROLE: &str = "Member";

pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn require(&self, id: Uuid) -> ApiResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Project not found"))
    }

    pub async fn with_owner(&self, project: Project) -> ApiResult<ProjectWithOwner> {
        let owner = self
            .store
            .find_user(project.owner_id)
            .await?
            .as_ref()
            .map(UserSummary::from);
        Ok(ProjectWithOwner { project, owner })
    }

    /// One page of projects, newest first, plus the overall count
    pub async fn list(&self, page: Page) -> ApiResult<(Vec<ProjectWithOwner>, i64)> {
        let projects = self.store.list_projects(page).await?;
        let total = self.store.count_projects().await?;

        let mut out = Vec::with_capacity(projects.len());
        for project in projects {
            out.push(self.with_owner(project).await?);
        }
        Ok((out, total))
    }

    /// Add users as members. Every id must name an existing user; already
    /// assigned users are skipped.
    pub async fn assign(&self, project_id: Uuid, user_ids: &[Uuid]) -> ApiResult<u64> {
        self.require(project_id).await?;

        for id in user_ids {
            if self.store.find_user(*id).await?.is_none() {
                return Err(ApiError::bad_request("One or more users do not exist"));
            }
        }

        let added = self.store.add_members(project_id, user_ids).await?;
        tracing::info!(project_id = %project_id, requested = user_ids.len(), added, "Project members assigned");
        Ok(added)
    }

    /// Owner first, then members in the order they joined
    pub async fn members(&self, project_id: Uuid) -> ApiResult<Vec<MemberView>> {
        let project = self.require(project_id).await?;
        let mut out = Vec::new();

        if let Some(owner) = self.store.find_user(project.owner_id).await? {
            out.push(MemberView {
                id: owner.id,
                name: owner.name,
                email: owner.email,
                role: OWNER_ROLE.to_string(),
            });
        }

        for member in self.store.list_members(project_id).await? {
            if let Some(user) = self.store.find_user(member.user_id).await? {
                out.push(MemberView {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: member.role.unwrap_or_else(|| DEFAULT_MEMBER_ROLE.to_string()),
                });
            }
        }
        Ok(out)
    }
}

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Project, Task, UserSummary};
use crate::database::{ProjectStore, Store, TaskStore, UserStore};
use crate::error::{ApiError, ApiResult};

/// Task with its project, assignee and creator embedded
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub project: Option<Project>,
    pub assigned: Option<UserSummary>,
    pub creator: Option<UserSummary>,
}

pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn require(&self, id: Uuid) -> ApiResult<Task> {
        self.store
            .find_task(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))
    }

    /// Reject assignments to users that do not exist
    pub async fn check_assignee(&self, assignee: Option<Uuid>) -> ApiResult<()> {
        if let Some(id) = assignee {
            if self.store.find_user(id).await?.is_none() {
                return Err(ApiError::bad_request("Assigned user does not exist"));
            }
        }
        Ok(())
    }

    async fn summary(&self, id: Option<Uuid>) -> ApiResult<Option<UserSummary>> {
        match id {
            Some(id) => Ok(self.store.find_user(id).await?.as_ref().map(UserSummary::from)),
            None => Ok(None),
        }
    }

    pub async fn hydrate(&self, task: Task) -> ApiResult<TaskView> {
        let project = self.store.find_project(task.project_id).await?;
        let assigned = self.summary(task.assigned_to).await?;
        let creator = self.summary(Some(task.created_by)).await?;
        Ok(TaskView {
            task,
            project,
            assigned,
            creator,
        })
    }

    pub async fn hydrate_all(&self, tasks: Vec<Task>) -> ApiResult<Vec<TaskView>> {
        let mut out = Vec::with_capacity(tasks.len());
        for task in tasks {
            out.push(self.hydrate(task).await?);
        }
        Ok(out)
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::{parse_id, ValidatedJson};
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::{NewTask, TaskStore};
use crate::error::ApiResult;
use crate::services::{ProjectService, TaskService};
use crate::types::Priority;

const NOT_FOUND: &str = "Project not found";

fn blank_or_uuid(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("uuid");
    err.message = Some("Invalid userId".into());
    Err(err)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// User id, or `""`/`null` for unassigned
    #[validate(custom(function = "blank_or_uuid"))]
    pub assigned_to: Option<String>,
}

impl CreateTaskRequest {
    fn assignee(&self) -> Option<Uuid> {
        self.assigned_to
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

/// POST /api/projects/:id/tasks - the caller is recorded as creator
pub async fn create_project_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let project = ProjectService::new(state.store.clone())
        .require(parse_id(&id, NOT_FOUND)?)
        .await?;

    let tasks = TaskService::new(state.store.clone());
    let assignee = body.assignee();
    tasks.check_assignee(assignee).await?;

    let task = state
        .store
        .create_task(NewTask {
            title: body.title,
            description: body.description.filter(|d| !d.is_empty()),
            priority: body.priority.unwrap_or_default(),
            project_id: project.id,
            created_by: identity.user_id()?,
            assigned_to: assignee,
        })
        .await?;

    tracing::info!(task_id = %task.id, project_id = %project.id, "Task created");
    let task = tasks.hydrate(task).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully", "task": task })),
    ))
}

/// GET /api/projects/:id/tasks - newest first
pub async fn list_project_tasks(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let project = ProjectService::new(state.store.clone())
        .require(parse_id(&id, NOT_FOUND)?)
        .await?;

    let tasks = state.store.tasks_for_project(project.id).await?;
    let tasks = TaskService::new(state.store.clone()).hydrate_all(tasks).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::api::{parse_id, ValidatedJson};
use crate::app::AppState;
use crate::database::{TaskChanges, TaskStore};
use crate::error::ApiResult;
use crate::services::{TaskService, TaskView};
use crate::types::{Priority, TaskStatus};

const NOT_FOUND: &str = "Task not found";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 3))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Uuid>,
}

/// GET /api/tasks/:id
pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TaskView>> {
    let tasks = TaskService::new(state.store.clone());
    let task = tasks.require(parse_id(&id, NOT_FOUND)?).await?;
    Ok(Json(tasks.hydrate(task).await?))
}

/// PUT /api/tasks/:id - partial update
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let tasks = TaskService::new(state.store.clone());
    tasks.require(id).await?;
    tasks.check_assignee(body.assigned_to).await?;

    let task = state
        .store
        .update_task(
            id,
            TaskChanges {
                title: body.title,
                description: body.description,
                status: body.status,
                priority: body.priority,
                assigned_to: body.assigned_to,
            },
        )
        .await?;
    Ok(Json(json!({ "message": "Task updated", "task": task })))
}

/// DELETE /api/tasks/:id (ADMIN)
pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.store.delete_task(id).await?;
    tracing::info!(task_id = %id, "Task deleted");
    Ok(Json(json!({ "message": "Task deleted" })))
}

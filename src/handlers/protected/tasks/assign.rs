use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{parse_id, RawJson};
use crate::app::AppState;
use crate::database::TaskStore;
use crate::error::{ApiError, ApiResult};
use crate::services::TaskService;

/// Reads `assignedTo`: a user id string, or `null`/`""` to unassign
fn assignee(body: &Value) -> ApiResult<Option<Uuid>> {
    let invalid = || ApiError::bad_request("Invalid assignedTo value");
    match body.get("assignedTo") {
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(s).map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// PUT /api/tasks/:id/assign
pub async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawJson(body): RawJson,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "Task not found")?;
    let assignee = assignee(&body)?;

    let tasks = TaskService::new(state.store.clone());
    tasks.check_assignee(assignee).await?;

    let task = state.store.set_task_assignee(id, assignee).await?;
    tracing::info!(task_id = %id, assignee = ?assignee, "Task assignment changed");
    let task = tasks.hydrate(task).await?;
    Ok(Json(json!({ "message": "Task assigned successfully", "task": task })))
}

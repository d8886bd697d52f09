use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{parse_id, RawJson};
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::services::ProjectService;

const NOT_FOUND: &str = "Project not found";

/// `userIds` must be an array of user id strings
fn user_ids(body: &Value) -> ApiResult<Vec<Uuid>> {
    let ids = body
        .get("userIds")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("userIds must be an array"))?;

    ids.iter()
        .map(|v| {
            v.as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| ApiError::bad_request("One or more users do not exist"))
        })
        .collect()
}

/// POST /api/projects/:id/assign (ADMIN)
pub async fn assign_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawJson(body): RawJson,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let ids = user_ids(&body)?;

    ProjectService::new(state.store.clone()).assign(id, &ids).await?;
    Ok(Json(json!({ "message": "Users assigned to project successfully" })))
}

/// GET /api/projects/:id/members
pub async fn list_members(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let members = ProjectService::new(state.store.clone())
        .members(parse_id(&id, NOT_FOUND)?)
        .await?;
    Ok(Json(json!({ "members": members })))
}

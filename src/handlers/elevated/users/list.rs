use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiResult;
use crate::services::UserService;

/// GET /api/auth/users - every user with the projects they are a member of
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let users = UserService::new(state.store.clone()).list_with_projects().await?;
    Ok(Json(json!({ "users": users })))
}

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiResult;
use crate::services::UserService;

/// GET /api/auth/users/count
pub async fn count_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let total = UserService::new(state.store.clone()).count().await?;
    Ok(Json(json!({ "success": true, "totalUsers": total })))
}

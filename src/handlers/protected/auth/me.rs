use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::services::UserService;

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<Value>> {
    let user = UserService::new(state.store.clone())
        .get(identity.user_id()?)
        .await?;

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "image": user.image,
    })))
}

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::handlers::public::auth::utils::queue_verification_email;
use crate::services::UserService;
use crate::types::Role;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// POST /api/auth/users - create an account with an explicit role
pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = UserService::new(state.store.clone())
        .register(body.name, body.email, body.password, body.role)
        .await?;

    tracing::info!(created_by = %identity.subject, user_id = %user.id, role = %user.role, "User created by admin");
    queue_verification_email(&state, &user.email).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

// handlers/public/auth/signup.rs - POST /api/auth/signup

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::utils::queue_verification_email;
use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::types::Role;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// POST /api/auth/signup - self-registration, always as USER
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = UserService::new(state.store.clone())
        .register(body.name, body.email, body.password, Role::User)
        .await?;

    queue_verification_email(&state, &user.email).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

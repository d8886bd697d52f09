// handlers/public/auth/signin.rs - POST /api/auth/signin

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::utils::session_cookie;
use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::database::models::UserInfo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthRejection;
use crate::services::UserService;

#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/signin - verify credentials, set the session cookie and
/// return the same token in the body for bearer clients
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<SigninRequest>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let user = UserService::new(state.store.clone())
        .authenticate(&body.email, &body.password)
        .await?;

    let codec = state.codec.as_deref().ok_or_else(|| {
        tracing::error!("JWT_SECRET is not configured; cannot issue session tokens");
        ApiError::from(AuthRejection::ServerMisconfigured)
    })?;

    let security = &state.config.security;
    let token = codec.issue(&user.id.to_string(), user.role, security.session_ttl())?;
    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok((
        jar.add(session_cookie(security, token.clone())),
        Json(json!({
            "message": "Login successful",
            "token": token,
            "user": UserInfo::from(&user),
        })),
    ))
}

// handlers/public/auth/signout.rs - POST /api/auth/signout

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use super::utils::cleared_cookie;
use crate::app::AppState;

/// POST /api/auth/signout - always succeeds, with or without a session
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.add(cleared_cookie(&state.config.security)),
        Json(json!({ "message": "Logout successful" })),
    )
}

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

use crate::app::AppState;
use crate::auth::{Identity, TokenCodec};
use crate::error::ApiError;

/// Terminal outcomes of the authentication and authorization checks.
///
/// The display string is exactly what the caller sees; the underlying cause
/// (which verification step failed, what configuration is missing) is only
/// ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Unauthorized: token missing")]
    TokenMissing,

    #[error("Unauthorized: bad token")]
    TokenInvalid,

    #[error("Unauthorized: invalid payload")]
    PayloadInvalid,

    #[error("Server config error")]
    ServerMisconfigured,

    #[error("You are not allowed to access this resource")]
    Forbidden,
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            AuthRejection::TokenMissing
            | AuthRejection::TokenInvalid
            | AuthRejection::PayloadInvalid => ApiError::unauthorized(message),
            AuthRejection::ServerMisconfigured => ApiError::internal_server_error(message),
            AuthRejection::Forbidden => ApiError::forbidden(message),
        }
    }
}

/// JWT authentication middleware: resolves the caller's identity and
/// injects it into the request, or rejects the request outright.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, request.headers(), &state.config.security.cookie_name);
    let identity = authenticate(state.codec.as_deref(), token.as_deref())?;

    tracing::debug!(subject = %identity.subject, role = %identity.role, "request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Locate the session token: a non-empty cookie wins over the bearer header
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = jar.get(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Verify a located token and validate its payload shape
pub fn authenticate(codec: Option<&TokenCodec>, token: Option<&str>) -> Result<Identity, AuthRejection> {
    let token = token.ok_or(AuthRejection::TokenMissing)?;

    let codec = codec.ok_or_else(|| {
        tracing::error!("JWT_SECRET is not configured; cannot verify session tokens");
        AuthRejection::ServerMisconfigured
    })?;

    let payload = codec.verify(token).map_err(|e| {
        tracing::debug!("session token rejected: {}", e);
        AuthRejection::TokenInvalid
    })?;

    payload.into_identity().map_err(|e| {
        tracing::debug!("session token payload rejected: {}", e);
        AuthRejection::PayloadInvalid
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

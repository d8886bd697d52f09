use axum_extra::extract::cookie::{Cookie, SameSite};
use time::OffsetDateTime;

use crate::app::AppState;
use crate::config::SecurityConfig;
use crate::queue::{EmailJob, EmailQueue};

/// Lifetime of the link sent in verification emails
pub const VERIFY_LINK_TTL_HOURS: i64 = 1;

/// Session cookie carrying a freshly issued token
pub fn session_cookie(security: &SecurityConfig, token: String) -> Cookie<'static> {
    Cookie::build((security.cookie_name.clone(), token))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(security.session_ttl().num_seconds()))
        .build()
}

/// Empty, already-expired cookie that makes the browser drop the session
pub fn cleared_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((security.cookie_name.clone(), String::new()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Queue the verification email for a new account. Failures are logged and
/// never fail the request.
pub async fn queue_verification_email(state: &AppState, email: &str) {
    let Some(codec) = state.codec.as_deref() else {
        tracing::warn!("No token codec configured; skipping verification email");
        return;
    };

    let job = match EmailJob::verification(
        codec,
        &state.config.mail.verify_url_base,
        email,
        chrono::Duration::hours(VERIFY_LINK_TTL_HOURS),
    ) {
        Ok(job) => job,
        Err(e) => {
            tracing::error!("Could not sign verification link: {}", e);
            return;
        }
    };

    if let Err(e) = state.queue.enqueue(job).await {
        tracing::warn!(email = %email, "Failed to queue verification email: {}", e);
    }
}

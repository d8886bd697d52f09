//! Role-based route guard.

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use super::auth::AuthRejection;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::types::Role;

/// Restricts a route to a fixed set of roles, chosen when the route is
/// registered. Must sit inside the authentication middleware; a request
/// reaching the guard without an [`Identity`] is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    allowed: Vec<Role>,
}

impl RoleGuard {
    pub fn allow(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut allowed: Vec<Role> = Vec::new();
        for role in roles {
            if !allowed.contains(&role) {
                allowed.push(role);
            }
        }
        Self { allowed }
    }

    pub fn admin_only() -> Self {
        Self::allow([Role::Admin])
    }

    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AuthRejection> {
        match identity {
            Some(identity) if self.allowed.contains(&identity.role) => Ok(()),
            Some(identity) => {
                tracing::warn!(
                    subject = %identity.subject,
                    role = %identity.role,
                    allowed = ?self.allowed,
                    "Authorization denied"
                );
                Err(AuthRejection::Forbidden)
            }
            None => {
                tracing::warn!("Authorization check without authentication");
                Err(AuthRejection::Forbidden)
            }
        }
    }
}

impl<S> Layer<S> for RoleGuard {
    type Service = RoleGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGuardService {
            inner,
            guard: self.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleGuardService<S> {
    inner: S,
    guard: RoleGuard,
}

impl<S> Service<Request<Body>> for RoleGuardService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if let Err(rejection) = self.guard.check(req.extensions().get::<Identity>()) {
            return Box::pin(async move { Ok(ApiError::from(rejection).into_response()) });
        }

        // Swap in a fresh clone so the instance polled ready is the one called
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

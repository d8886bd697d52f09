use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenCodec;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_auth, RoleGuard};
use crate::queue::EmailQueue;

/// Shared dependencies handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// `None` when no signing secret is configured; token verification then
    /// answers 500 instead of guessing.
    pub codec: Option<Arc<TokenCodec>>,
    pub queue: Arc<dyn EmailQueue>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        codec: Option<TokenCodec>,
        queue: Arc<dyn EmailQueue>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            codec: codec.map(Arc::new),
            queue,
            config: Arc::new(config),
        }
    }
}

/// Assemble the full HTTP surface
pub fn router(state: AppState) -> Router {
    let protected = member_routes()
        .merge(admin_routes().route_layer(RoleGuard::admin_only()))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let app = Router::new()
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected)
        .layer(cors_layer(&state.config.security));

    let app = if state.config.api.enable_request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/signout", post(auth::signout))
}

/// Any authenticated caller
fn member_routes() -> Router<AppState> {
    use protected::{auth, projects, tasks};

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route(
            "/api/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route("/api/projects/my", get(projects::my_projects))
        .route("/api/projects/count", get(projects::count_projects))
        .route("/api/projects/:id", get(projects::get_project))
        .route("/api/projects/:id/members", get(projects::list_members))
        .route(
            "/api/projects/:id/tasks",
            post(projects::create_project_task).get(projects::list_project_tasks),
        )
        .route("/api/tasks", get(tasks::list_tasks))
        .route("/api/tasks/:id", get(tasks::get_task).put(tasks::update_task))
        .route("/api/tasks/:id/assign", put(tasks::assign_task))
}

/// ADMIN only; mounted behind the role guard
fn admin_routes() -> Router<AppState> {
    use axum::routing::delete;
    use elevated::users;
    use protected::{projects, tasks};

    Router::new()
        .route("/api/auth/users", get(users::list_users).post(users::create_user))
        .route("/api/auth/users/count", get(users::count_users))
        .route(
            "/api/projects/:id",
            put(projects::update_project).delete(projects::delete_project),
        )
        .route("/api/projects/:id/assign", post(projects::assign_members))
        .route("/api/tasks/:id", delete(tasks::delete_task))
}

/// Credentialed CORS for the configured browser origins; permissive when
/// none are configured.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok", "database": "ok" }))),
        Err(e) => {
            tracing::warn!("Health check: database unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "ok", "database": "unavailable" })),
            )
        }
    }
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::{total_pages, PageQuery, ValidatedJson};
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::{NewProject, ProjectStore};
use crate::error::ApiResult;
use crate::services::ProjectService;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 3, message = "Project title must be at least 3 characters long"))]
    pub title: String,
    pub description: Option<String>,
}

/// POST /api/projects - the caller becomes the owner
pub async fn create_project(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(body): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let project = state
        .store
        .create_project(NewProject {
            title: body.title,
            description: body.description,
            owner_id: identity.user_id()?,
        })
        .await?;

    tracing::info!(project_id = %project.id, owner = %project.owner_id, "Project created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Project created", "project": project })),
    ))
}

/// GET /api/projects?page=&limit=
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    let page = query.page();
    let (projects, total) = ProjectService::new(state.store.clone()).list(page).await?;

    Ok(Json(json!({
        "success": true,
        "total": total,
        "page": page.page,
        "totalPages": total_pages(total, page.limit),
        "projects": projects,
    })))
}

/// GET /api/projects/my - owned or joined
pub async fn my_projects(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<Value>> {
    let projects = state.store.projects_for_user(identity.user_id()?).await?;
    Ok(Json(json!({ "success": true, "projects": projects })))
}

/// GET /api/projects/count
pub async fn count_projects(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let total = state.store.count_projects().await?;
    Ok(Json(json!({ "success": true, "totalProjects": total })))
}

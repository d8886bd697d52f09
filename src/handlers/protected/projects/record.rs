use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::{parse_id, ValidatedJson};
use crate::app::AppState;
use crate::database::{ProjectChanges, ProjectStore};
use crate::error::ApiResult;
use crate::services::ProjectService;

const NOT_FOUND: &str = "Project not found";

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 3, message = "Project title must be at least 3 characters long"))]
    pub title: Option<String>,
    pub description: Option<String>,
}

/// GET /api/projects/:id
pub async fn get_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let project = ProjectService::new(state.store.clone())
        .require(parse_id(&id, NOT_FOUND)?)
        .await?;
    Ok(Json(json!({ "success": true, "project": project })))
}

/// PUT /api/projects/:id (ADMIN)
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateProjectRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, NOT_FOUND)?;
    ProjectService::new(state.store.clone()).require(id).await?;

    let project = state
        .store
        .update_project(
            id,
            ProjectChanges {
                title: body.title,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(json!({ "success": true, "project": project })))
}

/// DELETE /api/projects/:id (ADMIN) - tasks and memberships go with it
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, NOT_FOUND)?;
    ProjectService::new(state.store.clone()).require(id).await?;

    state.store.delete_project(id).await?;
    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(json!({ "success": true, "message": "Project deleted successfully" })))
}

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::PageQuery;
use crate::app::AppState;
use crate::database::TaskStore;
use crate::error::ApiResult;
use crate::services::TaskService;

/// GET /api/tasks?page=&limit=
pub async fn list_tasks(State(state): State<AppState>, Query(query): Query<PageQuery>) -> ApiResult<Json<Value>> {
    let page = query.page();
    let tasks = state.store.list_tasks(page).await?;
    let total = state.store.count_tasks().await?;
    let tasks = TaskService::new(state.store.clone()).hydrate_all(tasks).await?;

    Ok(Json(json!({
        "total": total,
        "page": page.page,
        "limit": page.limit,
        "tasks": tasks,
    })))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::timetable::{CourseId, Workspace};
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub ids: Vec<CourseId>,
}

/// Summary of the current selection shared by the selection and plan endpoints.
pub(crate) fn selection_summary(workspace: &Workspace) -> Value {
    json!({
        "ids": workspace.selection().ids(),
        "total_credits": workspace.total_credits(),
        "conflicts": workspace.conflicts(),
    })
}

/// GET /selection
pub async fn get_selection(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /selection");

    match s.workspace() {
        Ok(workspace) => (StatusCode::OK, Json(selection_summary(&workspace))).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /selection
/// Replaces the selection with the given ids
pub async fn put_selection(
    State(s): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    info!("PUT /selection ({} ids)", request.ids.len());

    match s.workspace() {
        Ok(mut workspace) => {
            workspace.replace_selection(request.ids);
            (StatusCode::OK, Json(selection_summary(&workspace))).into_response()
        }
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /selection/toggle/:id
pub async fn post_toggle(Path(id): Path<CourseId>, State(s): State<Arc<AppState>>) -> Response {
    info!("POST /selection/toggle/{}", id);

    let mut workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    match workspace.toggle(id) {
        Ok(selected) => {
            let mut summary = selection_summary(&workspace);
            summary["selected"] = json!(selected);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

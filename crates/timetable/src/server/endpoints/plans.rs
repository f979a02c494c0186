use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::endpoints::selection::selection_summary;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SavePlanRequest {
    /// Blank or missing names get an automatic "Timetable N" label
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /plans
/// Returns saved plans, newest first
pub async fn get_plans(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /plans");

    match s.workspace() {
        Ok(workspace) => (StatusCode::OK, Json(workspace.plans())).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /plans
/// Saves the current selection as a new plan
pub async fn post_plan(
    State(s): State<Arc<AppState>>,
    Json(request): Json<SavePlanRequest>,
) -> Response {
    info!("POST /plans (name={:?})", request.name);

    let workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    match workspace.save_plan(request.name.as_deref()) {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(e) => {
            error!("Failed to save plan: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// DELETE /plans/:plan_id
pub async fn delete_plan(Path(plan_id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /plans/{}", plan_id);

    let workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    match workspace.delete_plan(&plan_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete plan: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /plans/:plan_id/apply
/// Replaces the current selection with the plan's
pub async fn post_apply_plan(
    Path(plan_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("POST /plans/{}/apply", plan_id);

    let mut workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    match workspace.apply_plan(&plan_id) {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({
                "plan": plan,
                "selection": selection_summary(&workspace),
            })),
        )
            .into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

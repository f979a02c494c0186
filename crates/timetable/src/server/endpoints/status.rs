use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /health
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    match s.workspace() {
        Ok(workspace) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "courses": workspace.catalog().len(),
                "selected": workspace.selection().len(),
            })),
        )
            .into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

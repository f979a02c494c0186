use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::timetable::{period_label, Day};
use crate::types::AppState;

/// GET /timetable
/// Returns the weekly grid of the current selection and the conflicted course ids
pub async fn get_timetable(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /timetable");

    let workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    let grid = workspace.grid();
    let rows: Vec<_> = grid
        .rows()
        .map(|(period, cells)| {
            let cells: Map<String, Value> = Day::ALL
                .iter()
                .zip(cells)
                .map(|(day, courses)| {
                    let ids: Vec<_> = courses.iter().map(|course| course.id).collect();
                    (day.to_string(), json!(ids))
                })
                .collect();

            json!({
                "period": period,
                "time": period_label(period),
                "cells": cells,
            })
        })
        .collect();

    let response = json!({
        "period_count": grid.period_count(),
        "rows": rows,
        "conflicts": workspace.conflicts(),
    });

    (StatusCode::OK, Json(response)).into_response()
}

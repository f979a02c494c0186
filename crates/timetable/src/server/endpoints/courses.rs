use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::server::types::ApiErrorType;
use crate::timetable::{format_slots, BatchTicket, CourseFilter, CourseRow, Day};
use crate::types::AppState;

/// Query parameters for browsing the catalog.
#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub major: Option<String>,
    pub grade: Option<u8>,
    pub day: Option<Day>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    pub source: String,
}

/// A batch of rows from the course data fetch service.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Major or field code the rows were fetched for
    pub source: String,
    /// Generation from `/courses/batches/ticket`; without one the batch always merges
    #[serde(default)]
    pub ticket: Option<u64>,
    pub rows: Vec<CourseRow>,
}

/// GET /courses
/// Returns catalog courses matching the filter, flagged if they clash with the selection
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
) -> Response {
    info!("GET /courses ({:?})", query);

    let workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    let filter = CourseFilter {
        major: query.major,
        grade: query.grade,
        day: query.day,
        search: query.search,
    };

    let response: Vec<_> = workspace
        .filter_courses(&filter)
        .into_iter()
        .map(|(course, conflict)| {
            json!({
                "id": course.id,
                "code": course.code,
                "name": course.name,
                "professor": course.professor,
                "credit": course.credit,
                "grade": course.grade,
                "area": course.area,
                "slots": course.slots,
                "slot_label": format_slots(&course.slots),
                "english": course.english,
                "remarks": course.remarks,
                "source_major": course.source_major,
                "selected": workspace.selection().contains(course.id),
                "conflict": conflict,
            })
        })
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /courses/batches/ticket
/// Issues a generation ticket before the fetch service starts a request
pub async fn post_batch_ticket(
    State(s): State<Arc<AppState>>,
    Json(request): Json<TicketRequest>,
) -> Response {
    info!("POST /courses/batches/ticket (source={})", request.source);

    match s.workspace() {
        Ok(mut workspace) => {
            let ticket = workspace.begin_batch(&request.source);
            (
                StatusCode::OK,
                Json(json!({
                    "source": ticket.source_label,
                    "ticket": ticket.generation,
                })),
            )
                .into_response()
        }
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /courses/batches
/// Merges a batch of fetched rows into the catalog
pub async fn post_batch(
    State(s): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Response {
    info!(
        "POST /courses/batches (source={}, ticket={:?}, rows={})",
        request.source,
        request.ticket,
        request.rows.len()
    );

    let mut workspace = match s.workspace() {
        Ok(workspace) => workspace,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };

    let result = match request.ticket {
        Some(generation) => {
            let ticket = BatchTicket {
                source_label: request.source.clone(),
                generation,
            };
            workspace.merge_ticketed(&ticket, &request.rows)
        }
        None => workspace.merge_rows(&request.rows, &request.source),
    };

    match result {
        Ok(outcome) => {
            let message = if request.rows.is_empty() {
                Some("No courses were returned for this query")
            } else {
                None
            };
            (
                StatusCode::OK,
                Json(json!({
                    "inserted": outcome.inserted,
                    "updated": outcome.updated,
                    "total": workspace.catalog().len(),
                    "message": message,
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Rejected course batch: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

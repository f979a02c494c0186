use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::server::endpoints::{courses, plans, selection, status, timetable};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Catalog browsing and batches from the fetch service
    let course_router = Router::new()
        .route("/courses", get(courses::get_courses))
        .route("/courses/batches", post(courses::post_batch))
        .route("/courses/batches/ticket", post(courses::post_batch_ticket));

    let selection_router = Router::new()
        .route(
            "/selection",
            get(selection::get_selection).put(selection::put_selection),
        )
        .route("/selection/toggle/:id", post(selection::post_toggle))
        .route("/timetable", get(timetable::get_timetable));

    let plan_router = Router::new()
        .route("/plans", get(plans::get_plans).post(plans::post_plan))
        .route("/plans/:plan_id", delete(plans::delete_plan))
        .route("/plans/:plan_id/apply", post(plans::post_apply_plan));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(course_router)
        .merge(selection_router)
        .merge(plan_router)
        .with_state(app_state)
}

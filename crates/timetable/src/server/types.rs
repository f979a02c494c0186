use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::timetable::TimetableError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    context: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            context,
        }
    }
}

impl From<TimetableError> for ApiErrorType {
    fn from(err: TimetableError) -> Self {
        let (status, message) = match &err {
            TimetableError::StaleBatch { .. } => (
                StatusCode::CONFLICT,
                "A newer batch for this source was already merged",
            ),
            e if e.is_not_found() => (StatusCode::NOT_FOUND, "No such plan or course"),
            e if e.is_retryable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage temporarily unavailable",
            ),
            TimetableError::UnknownTicket { .. } => (
                StatusCode::BAD_REQUEST,
                "Batch ticket was not issued for this source",
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        Self::from((status, message, Some(err.to_string())))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_timetable_errors() {
        let status = |err: TimetableError| ApiErrorType::from(err).status;

        assert_eq!(
            status(TimetableError::Serialization {
                message: "key must be a string".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(TimetableError::UnknownTicket {
                source_label: "ATJA1".to_string(),
                ticket: 9
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(TimetableError::Store {
                message: "locked".to_string()
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(TimetableError::PlanNotFound {
                id: "missing".to_string()
            }),
            StatusCode::NOT_FOUND
        );
    }
}

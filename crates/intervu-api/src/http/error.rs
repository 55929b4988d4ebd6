//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use intervu_types::error::InterviewError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Interview service errors.
    Interview(InterviewError),
    /// Authentication failure.
    Unauthorized(String),
    /// Malformed request input.
    Validation(String),
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        AppError::Interview(e)
    }
}

impl AppError {
    /// Status, machine-readable code and message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Interview(e) => match e {
                InterviewError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                InterviewError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string()),
                InterviewError::InvalidState(msg) => {
                    (StatusCode::CONFLICT, "INVALID_STATE", msg.clone())
                }
                InterviewError::CreditsExhausted { .. } => {
                    (StatusCode::PAYMENT_REQUIRED, "CREDITS_EXHAUSTED", e.to_string())
                }
                InterviewError::FeedbackExists => {
                    (StatusCode::CONFLICT, "FEEDBACK_EXISTS", e.to_string())
                }
                InterviewError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                InterviewError::Upstream(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
                }
                InterviewError::Configuration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    e.to_string(),
                ),
                InterviewError::Repository(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage error".to_string(),
                ),
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }

    /// Client-facing message, also used for realtime `error` frames.
    pub fn message(&self) -> String {
        self.parts().2
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = ?self, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervu_types::error::RepositoryError;

    fn status_of(err: InterviewError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_interview_error_statuses() {
        assert_eq!(status_of(InterviewError::NotFound("interview".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(InterviewError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(InterviewError::InvalidState("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(InterviewError::CreditsExhausted {
                credit_type: "specialized".into()
            }),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(status_of(InterviewError::FeedbackExists), StatusCode::CONFLICT);
        assert_eq!(status_of(InterviewError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(InterviewError::Upstream("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(InterviewError::Configuration("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(RepositoryError::Connection.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_status() {
        let resp = AppError::Unauthorized("bad token".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_repository_details_not_leaked() {
        let err = AppError::from(InterviewError::from(RepositoryError::Query(
            "no such table: interview_sessions".into(),
        )));
        assert_eq!(err.message(), "Storage error");
    }

    #[test]
    fn test_state_message_passthrough() {
        let err = AppError::from(InterviewError::InvalidState(
            "interview is not in progress".into(),
        ));
        assert_eq!(err.message(), "interview is not in progress");
    }
}

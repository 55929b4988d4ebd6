//! Interview feedback REST handlers.

use std::time::Instant;

use axum::extract::{Path, State};

use intervu_types::feedback::StoredFeedback;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::handlers::interview::parse_interview_id;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/interviews/{id}/feedback
pub async fn generate_feedback(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<StoredFeedback>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let feedback = state.interview_service.generate_feedback(&caller, &id).await?;
    Ok(ApiResponse::created(feedback, start)
        .with_link("interview", &format!("/api/v1/interviews/{id}")))
}

/// GET /api/v1/interviews/{id}/feedback
pub async fn get_feedback(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<StoredFeedback>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let feedback = state.interview_service.get_feedback(&caller, &id).await?;
    Ok(ApiResponse::success(feedback, start))
}

/// GET /api/v1/feedback/my-feedbacks
pub async fn list_my_feedback(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<ApiResponse<Vec<StoredFeedback>>, AppError> {
    let start = Instant::now();
    let feedback = state.interview_service.list_feedback(&caller).await?;
    Ok(ApiResponse::success(feedback, start))
}

//! Interview session REST handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use intervu_types::interview::{InterviewSession, InterviewSettings};
use intervu_types::message::{InterviewMessage, MessageAuthor};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for adding a message with an explicit author.
#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    pub role: MessageAuthor,
    pub content: String,
}

/// Request body for a candidate turn.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub content: String,
}

/// Request body for a client clock update.
#[derive(Debug, Deserialize)]
pub struct TimeUpdateRequest {
    pub remaining_time: i64,
}

#[derive(Debug, Serialize)]
pub struct StartedResponse {
    pub interview: InterviewSession,
    pub opening: InterviewMessage,
}

#[derive(Debug, Serialize)]
pub struct EndedResponse {
    pub interview: InterviewSession,
    pub closing: InterviewMessage,
}

#[derive(Debug, Serialize)]
pub struct TimeRunningOutResponse {
    /// `None` when the wrap-up question was already asked.
    pub message: Option<InterviewMessage>,
}

pub(crate) fn parse_interview_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid interview id: '{raw}'")))
}

fn interview_href(id: &Uuid) -> String {
    format!("/api/v1/interviews/{id}")
}

/// POST /api/v1/interviews
pub async fn create_interview(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(settings): Json<InterviewSettings>,
) -> Result<ApiResponse<InterviewSession>, AppError> {
    let start = Instant::now();
    let session = state.interview_service.create(&caller, settings).await?;
    let href = interview_href(&session.id);
    Ok(ApiResponse::created(session, start)
        .with_link("self", &href)
        .with_link("start", &format!("{href}/start")))
}

/// GET /api/v1/interviews/my-interviews
pub async fn list_my_interviews(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<ApiResponse<Vec<InterviewSession>>, AppError> {
    let start = Instant::now();
    let sessions = state.interview_service.list_mine(&caller).await?;
    Ok(ApiResponse::success(sessions, start))
}

/// GET /api/v1/interviews/admin/all
pub async fn list_all_interviews(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<ApiResponse<Vec<InterviewSession>>, AppError> {
    let start = Instant::now();
    let sessions = state.interview_service.list_all(&caller).await?;
    Ok(ApiResponse::success(sessions, start))
}

/// GET /api/v1/interviews/{id}
pub async fn get_interview(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<InterviewSession>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let session = state.interview_service.get(&caller, &id).await?;
    let href = interview_href(&id);
    Ok(ApiResponse::success(session, start)
        .with_link("self", &href)
        .with_link("messages", &format!("{href}/messages")))
}

/// DELETE /api/v1/interviews/{id}
pub async fn delete_interview(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    state.interview_service.delete(&caller, &id).await?;
    Ok(ApiResponse::success(
        serde_json::json!({ "deleted": true, "id": id }),
        start,
    ))
}

/// GET /api/v1/interviews/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<InterviewMessage>>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let messages = state.interview_service.messages(&caller, &id).await?;
    Ok(ApiResponse::success(messages, start))
}

/// POST /api/v1/interviews/{id}/start
pub async fn start_interview(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<StartedResponse>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let started = state.interview_service.start(&caller, &id).await?;
    Ok(ApiResponse::success(
        StartedResponse {
            interview: started.session,
            opening: started.opening,
        },
        start,
    )
    .with_link("ws", &format!("/api/v1/interviews/ws/{id}")))
}

/// POST /api/v1/interviews/{id}/end
pub async fn end_interview(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<EndedResponse>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let ended = state.interview_service.end(&caller, &id).await?;
    Ok(ApiResponse::success(
        EndedResponse {
            interview: ended.session,
            closing: ended.closing,
        },
        start,
    )
    .with_link("feedback", &format!("{}/feedback", interview_href(&id))))
}

/// POST /api/v1/interviews/{id}/messages/add
pub async fn add_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AddMessageRequest>,
) -> Result<ApiResponse<InterviewMessage>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let message = state
        .interview_service
        .add_message(&caller, &id, body.role, &body.content)
        .await?;
    Ok(ApiResponse::created(message, start))
}

/// POST /api/v1/interviews/{id}/response
pub async fn respond(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<RespondRequest>,
) -> Result<ApiResponse<InterviewMessage>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let reply = state
        .interview_service
        .respond(&caller, &id, &body.content)
        .await?;
    Ok(ApiResponse::success(reply, start))
}

/// POST /api/v1/interviews/{id}/time
pub async fn update_time(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<TimeUpdateRequest>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    state
        .interview_service
        .update_remaining_time(&caller, &id, body.remaining_time)
        .await?;
    Ok(ApiResponse::success(
        serde_json::json!({ "remaining_time": body.remaining_time }),
        start,
    ))
}

/// POST /api/v1/interviews/{id}/time-running-out
pub async fn time_running_out(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<TimeRunningOutResponse>, AppError> {
    let start = Instant::now();
    let id = parse_interview_id(&id)?;
    let message = state
        .interview_service
        .handle_time_running_out(&caller, &id)
        .await?;
    Ok(ApiResponse::success(TimeRunningOutResponse { message }, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use intervu_core::interview::repository::CreditLedger;
    use intervu_core::interview::service::Caller;
    use intervu_types::error::InterviewError;
    use intervu_types::interview::{InterviewType, SessionStatus};

    use crate::testing::{grant_credits, new_caller, test_state};

    fn settings() -> InterviewSettings {
        InterviewSettings::basic("Backend Engineer", InterviewType::Technical)
    }

    async fn create(state: &AppState, caller: Caller) -> InterviewSession {
        create_interview(State(state.clone()), AuthUser(caller), Json(settings()))
            .await
            .unwrap()
            .data
    }

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (state, _dir) = test_state(&[]).await;
        let caller = new_caller();

        let resp = create_interview(State(state.clone()), AuthUser(caller), Json(settings()))
            .await
            .unwrap();
        assert_eq!(resp.into_response().status(), StatusCode::CREATED);

        let mine = list_my_interviews(State(state.clone()), AuthUser(caller))
            .await
            .unwrap()
            .data;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, SessionStatus::Created);

        let fetched = get_interview(
            State(state.clone()),
            AuthUser(caller),
            Path(mine[0].id.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(fetched.data.id, mine[0].id);
        assert!(fetched.links.contains_key("messages"));
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let (state, _dir) = test_state(&[]).await;
        let err = get_interview(
            State(state),
            AuthUser(new_caller()),
            Path("not-a-uuid".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_user_forbidden() {
        let (state, _dir) = test_state(&[]).await;
        let session = create(&state, new_caller()).await;

        let err = get_interview(
            State(state),
            AuthUser(new_caller()),
            Path(session.id.to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(status_of(err), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_start_without_credits_is_payment_required() {
        let (state, _dir) = test_state(&[]).await;
        let caller = new_caller();
        let session = create(&state, caller).await;

        let err = start_interview(State(state), AuthUser(caller), Path(session.id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Interview(InterviewError::CreditsExhausted { .. })
        ));
        assert_eq!(status_of(err), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_one_credit_two_sessions_start_together() {
        let (state, _dir) = test_state(&[]).await;
        let caller = new_caller();
        grant_credits(&state, &caller, "basic_15min", 1).await;
        let first = create(&state, caller).await;
        let second = create(&state, caller).await;

        let (a, b) = tokio::join!(
            start_interview(State(state.clone()), AuthUser(caller), Path(first.id.to_string())),
            start_interview(State(state.clone()), AuthUser(caller), Path(second.id.to_string()))
        );

        let (won, lost) = match (a, b) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
            (a, b) => panic!("expected one winner, got ok={} and ok={}", a.is_ok(), b.is_ok()),
        };
        assert_eq!(won.data.interview.status, SessionStatus::InProgress);
        assert!(matches!(
            lost,
            AppError::Interview(InterviewError::CreditsExhausted { .. })
        ));

        let credits = state
            .interview_service
            .credits()
            .list_credits(&caller.user_id)
            .await
            .unwrap();
        assert_eq!(credits.iter().map(|c| c.remaining).sum::<u32>(), 0);
    }

    #[tokio::test]
    async fn test_full_rest_flow() {
        let (state, _dir) = test_state(&[
            "Hello, I'm Alex. Tell me about yourself.",
            "Interesting. How did you test it?",
            "Thanks for your time today.",
        ])
        .await;
        let caller = new_caller();
        grant_credits(&state, &caller, "basic_15min", 1).await;
        let session = create(&state, caller).await;
        let id = session.id.to_string();

        let started = start_interview(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap()
            .data;
        assert_eq!(started.interview.status, SessionStatus::InProgress);
        assert!(started.opening.content.starts_with("Hello"));

        let reply = respond(
            State(state.clone()),
            AuthUser(caller),
            Path(id.clone()),
            Json(RespondRequest {
                content: "I build payment systems.".to_string(),
            }),
        )
        .await
        .unwrap()
        .data;
        assert_eq!(reply.role, MessageAuthor::Interviewer);

        update_time(
            State(state.clone()),
            AuthUser(caller),
            Path(id.clone()),
            Json(TimeUpdateRequest {
                remaining_time: 600_000,
            }),
        )
        .await
        .unwrap();

        let ended = end_interview(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap()
            .data;
        assert_eq!(ended.interview.status, SessionStatus::Completed);

        let transcript = list_messages(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap()
            .data;
        assert_eq!(transcript.len(), 4);
        assert!(transcript.windows(2).all(|w| w[0].seq < w[1].seq));

        let err = end_interview(State(state), AuthUser(caller), Path(id))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_time_running_out_once() {
        let (state, _dir) = test_state(&["Opening.", "What would you do differently?"]).await;
        let caller = new_caller();
        grant_credits(&state, &caller, "basic_15min", 1).await;
        let session = create(&state, caller).await;
        let id = session.id.to_string();
        start_interview(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap();

        let first = time_running_out(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap()
            .data;
        assert!(first.message.is_some());

        let second = time_running_out(State(state), AuthUser(caller), Path(id))
            .await
            .unwrap()
            .data;
        assert!(second.message.is_none());
    }

    #[tokio::test]
    async fn test_admin_list_requires_admin() {
        let (state, _dir) = test_state(&[]).await;
        create(&state, new_caller()).await;

        let err = list_all_interviews(State(state.clone()), AuthUser(new_caller()))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), StatusCode::FORBIDDEN);

        let all = list_all_interviews(State(state), AuthUser(Caller::admin(Uuid::now_v7())))
            .await
            .unwrap()
            .data;
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let (state, _dir) = test_state(&[]).await;
        let caller = new_caller();
        let session = create(&state, caller).await;
        let id = session.id.to_string();

        delete_interview(State(state.clone()), AuthUser(caller), Path(id.clone()))
            .await
            .unwrap();
        let err = get_interview(State(state), AuthUser(caller), Path(id))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }
}

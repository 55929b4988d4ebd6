//! Interview session orchestration.
//!
//! `InterviewService` owns the session state machine
//! (`created -> in_progress -> completed`), transcript persistence, credit
//! consumption and authorization. Model calls are delegated to the
//! [`InterviewEngine`].

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use intervu_types::credit::DebitOutcome;
use intervu_types::error::{InterviewError, RepositoryError};
use intervu_types::feedback::StoredFeedback;
use intervu_types::interview::{InterviewSession, InterviewSettings, SessionStatus};
use intervu_types::message::{InterviewMessage, MessageAuthor};

use crate::engine::{InterviewEngine, TextStream};
use crate::prompt::language::resolve_language;

use super::clock::time_running_out_instruction;
use super::content::cap_content;
use super::repository::{CreditLedger, FeedbackRepository, MessageRepository, SessionRepository};

const BASIC_15_CREDIT: &str = "basic_15min";
const BASIC_30_CREDIT: &str = "basic_30min";

/// The authenticated principal behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    pub fn can_access(&self, session: &InterviewSession) -> bool {
        self.is_admin || session.user_id == self.user_id
    }
}

/// Result of starting an interview.
#[derive(Debug, Clone)]
pub struct StartedInterview {
    pub session: InterviewSession,
    pub opening: InterviewMessage,
}

/// Result of ending an interview.
#[derive(Debug, Clone)]
pub struct EndedInterview {
    pub session: InterviewSession,
    pub closing: InterviewMessage,
}

/// A reply being generated incrementally.
///
/// `message_id` names the empty interviewer placeholder that
/// [`InterviewService::finish_streaming_reply`] fills once the stream ends.
pub struct StreamingReply {
    pub candidate_message: InterviewMessage,
    pub message_id: Uuid,
    pub stream: TextStream,
}

/// Orchestrates interview sessions.
///
/// Generic over its storage ports so intervu-core never depends on
/// intervu-infra.
pub struct InterviewService<S, M, C, F>
where
    S: SessionRepository,
    M: MessageRepository,
    C: CreditLedger,
    F: FeedbackRepository,
{
    sessions: S,
    messages: M,
    credits: C,
    feedback: F,
    engine: InterviewEngine,
}

impl<S, M, C, F> InterviewService<S, M, C, F>
where
    S: SessionRepository,
    M: MessageRepository,
    C: CreditLedger,
    F: FeedbackRepository,
{
    pub fn new(sessions: S, messages: M, credits: C, feedback: F, engine: InterviewEngine) -> Self {
        Self {
            sessions,
            messages,
            credits,
            feedback,
            engine,
        }
    }

    pub fn credits(&self) -> &C {
        &self.credits
    }

    // --- Session lifecycle ---

    /// Validate settings and persist a new session in `created`.
    pub async fn create(
        &self,
        caller: &Caller,
        settings: InterviewSettings,
    ) -> Result<InterviewSession, InterviewError> {
        settings.validate().map_err(InterviewError::Validation)?;
        // Fail early if no prompt strategy would accept these settings.
        self.engine.prompts().get_provider(&settings)?;

        let session = InterviewSession::new(caller.user_id, settings);
        self.sessions.create_session(&session).await?;
        info!(
            session_id = %session.id,
            user_id = %caller.user_id,
            credit_type = %session.settings.credit_type(),
            "Interview session created"
        );
        Ok(session)
    }

    /// A session the caller owns (or any session for admins).
    pub async fn get(&self, caller: &Caller, id: &Uuid) -> Result<InterviewSession, InterviewError> {
        let session = self
            .sessions
            .get_session(id)
            .await?
            .ok_or_else(|| InterviewError::NotFound("interview".to_string()))?;
        if !caller.can_access(&session) {
            return Err(InterviewError::Forbidden);
        }
        Ok(session)
    }

    pub async fn list_mine(&self, caller: &Caller) -> Result<Vec<InterviewSession>, InterviewError> {
        Ok(self.sessions.list_sessions_for_user(&caller.user_id).await?)
    }

    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<InterviewSession>, InterviewError> {
        if !caller.is_admin {
            return Err(InterviewError::Forbidden);
        }
        Ok(self.sessions.list_all_sessions().await?)
    }

    /// Transcript ordered by `seq`.
    pub async fn messages(
        &self,
        caller: &Caller,
        id: &Uuid,
    ) -> Result<Vec<InterviewMessage>, InterviewError> {
        self.get(caller, id).await?;
        Ok(self.messages.list_messages(id).await?)
    }

    /// Debit one credit, move to `in_progress`, and store the opening turn.
    pub async fn start(
        &self,
        caller: &Caller,
        id: &Uuid,
    ) -> Result<StartedInterview, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::Created)?;

        let credit_id = self.debit_credit(&session).await?;

        let started = self
            .sessions
            .mark_started(id, &credit_id, Utc::now())
            .await?;
        if !started {
            // Another request won the transition; give the unit back.
            self.credits.refund_one(&credit_id).await?;
            warn!(session_id = %id, credit_id = %credit_id, "Lost start race, credit refunded");
            return Err(InterviewError::InvalidState(
                "interview has already been started".to_string(),
            ));
        }
        info!(session_id = %id, credit_id = %credit_id, "Interview started");

        let opening = if session.settings.is_specialized() {
            self.engine
                .generate_specialized_opening(&session.settings)
                .await?
        } else {
            self.engine.generate_opening(&session.settings).await?
        };
        let opening = self
            .store(id, MessageAuthor::Interviewer, &opening)
            .await?;

        let session = self.reload(id).await?;
        Ok(StartedInterview { session, opening })
    }

    /// Persist a message with an explicit author.
    pub async fn add_message(
        &self,
        caller: &Caller,
        id: &Uuid,
        role: MessageAuthor,
        content: &str,
    ) -> Result<InterviewMessage, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;
        self.store(id, role, content).await
    }

    /// Store the candidate's turn and return the interviewer's reply.
    pub async fn respond(
        &self,
        caller: &Caller,
        id: &Uuid,
        content: &str,
    ) -> Result<InterviewMessage, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;
        require_content(content)?;

        self.store(id, MessageAuthor::Candidate, content).await?;
        let history = self.messages.list_messages(id).await?;

        let reply = self
            .engine
            .generate_response(&session.settings, &history)
            .await?;
        self.store(id, MessageAuthor::Interviewer, &reply).await
    }

    /// Store the candidate's turn plus an empty interviewer placeholder and
    /// start streaming the reply.
    pub async fn respond_streaming(
        &self,
        caller: &Caller,
        id: &Uuid,
        content: &str,
    ) -> Result<StreamingReply, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;
        require_content(content)?;

        let candidate_message = self.store(id, MessageAuthor::Candidate, content).await?;
        let history = self.messages.list_messages(id).await?;
        let stream = self
            .engine
            .generate_response_stream(&session.settings, &history)?;

        let placeholder = self.store(id, MessageAuthor::Interviewer, "").await?;
        Ok(StreamingReply {
            candidate_message,
            message_id: placeholder.id,
            stream,
        })
    }

    /// Write the accumulated streamed text into its placeholder.
    ///
    /// Allowed after the session completed: the placeholder was stored while
    /// it was in progress and only its text arrives late.
    pub async fn finish_streaming_reply(
        &self,
        caller: &Caller,
        session_id: &Uuid,
        message_id: &Uuid,
        content: &str,
    ) -> Result<(), InterviewError> {
        self.get(caller, session_id).await?;
        let capped = cap_content(content);
        self.messages
            .update_message_content(session_id, message_id, &capped)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => InterviewError::NotFound("message".to_string()),
                other => InterviewError::from(other),
            })?;
        info!(
            session_id = %session_id,
            message_id = %message_id,
            chars = capped.chars().count(),
            "Streamed reply persisted"
        );
        Ok(())
    }

    /// Record the client's clock.
    pub async fn update_remaining_time(
        &self,
        caller: &Caller,
        id: &Uuid,
        remaining_time_ms: i64,
    ) -> Result<(), InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;
        self.sessions
            .update_remaining_time(id, remaining_time_ms, Utc::now())
            .await?;
        Ok(())
    }

    /// Ask the interviewer for a final question, once per session.
    ///
    /// Returns `None` when the wrap-up already happened.
    pub async fn handle_time_running_out(
        &self,
        caller: &Caller,
        id: &Uuid,
    ) -> Result<Option<InterviewMessage>, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;

        if !self.sessions.mark_finishing(id).await? {
            info!(session_id = %id, "Wrap-up already triggered, skipping");
            return Ok(None);
        }

        let settings = &session.settings;
        if settings.language.is_none() {
            info!(
                session_id = %id,
                language = %resolve_language(settings),
                "No language configured, inferred from job title and instructions"
            );
        }
        let instruction = time_running_out_instruction(resolve_language(settings));

        let history = self.messages.list_messages(id).await?;
        let reply = self
            .engine
            .generate_time_running_out_response(settings, &history, instruction)
            .await?;
        let message = self.store(id, MessageAuthor::Interviewer, &reply).await?;
        info!(session_id = %id, "Time running out, final question stored");
        Ok(Some(message))
    }

    /// Move to `completed` and store the closing statement.
    pub async fn end(&self, caller: &Caller, id: &Uuid) -> Result<EndedInterview, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::InProgress)?;

        if !self.sessions.mark_completed(id, Utc::now()).await? {
            return Err(InterviewError::InvalidState(
                "interview is not in progress".to_string(),
            ));
        }
        info!(session_id = %id, "Interview completed");

        let closing = self.engine.generate_closing(&session.settings).await?;
        let closing = InterviewMessage::new(*id, MessageAuthor::Interviewer, cap_content(&closing));
        let closing = self
            .messages
            .append_closing(&closing)
            .await?
            .ok_or_else(|| {
                InterviewError::InvalidState("interview is no longer completed".to_string())
            })?;

        let session = self.reload(id).await?;
        Ok(EndedInterview { session, closing })
    }

    /// Delete a session in any state, with its transcript and feedback.
    pub async fn delete(&self, caller: &Caller, id: &Uuid) -> Result<(), InterviewError> {
        self.get(caller, id).await?;
        if !self.sessions.delete_session(id).await? {
            return Err(InterviewError::NotFound("interview".to_string()));
        }
        info!(session_id = %id, user_id = %caller.user_id, "Interview deleted");
        Ok(())
    }

    // --- Feedback ---

    /// Generate and store feedback for a completed interview.
    pub async fn generate_feedback(
        &self,
        caller: &Caller,
        id: &Uuid,
    ) -> Result<StoredFeedback, InterviewError> {
        let session = self.get(caller, id).await?;
        require_status(&session, SessionStatus::Completed)?;

        if self.feedback.get_feedback(id).await?.is_some() {
            return Err(InterviewError::FeedbackExists);
        }

        let history = self.messages.list_messages(id).await?;
        if history.iter().all(InterviewMessage::is_blank) {
            return Err(InterviewError::Validation(
                "interview has no transcript to evaluate".to_string(),
            ));
        }

        let result = self
            .engine
            .generate_feedback(&session.settings, &history)
            .await?;
        let stored = StoredFeedback::new(*id, result);
        if !self.feedback.insert_feedback_if_absent(&stored).await? {
            return Err(InterviewError::FeedbackExists);
        }
        info!(
            session_id = %id,
            overall_score = stored.result.overall_score,
            "Feedback stored"
        );
        Ok(stored)
    }

    pub async fn get_feedback(
        &self,
        caller: &Caller,
        id: &Uuid,
    ) -> Result<StoredFeedback, InterviewError> {
        self.get(caller, id).await?;
        self.feedback
            .get_feedback(id)
            .await?
            .ok_or_else(|| InterviewError::NotFound("feedback".to_string()))
    }

    pub async fn list_feedback(&self, caller: &Caller) -> Result<Vec<StoredFeedback>, InterviewError> {
        Ok(self.feedback.list_feedback_for_user(&caller.user_id).await?)
    }

    // --- Helpers ---

    async fn debit_credit(&self, session: &InterviewSession) -> Result<Uuid, InterviewError> {
        let credit_type = session.settings.credit_type();
        let duration = Some(session.duration_minutes);

        let outcome = self
            .credits
            .debit_one(&session.user_id, &credit_type, duration)
            .await?;
        let outcome = match outcome {
            DebitOutcome::NoneAvailable if credit_type == BASIC_15_CREDIT => {
                info!(
                    session_id = %session.id,
                    "No basic_15min credit, falling back to basic_30min"
                );
                self.credits
                    .debit_one(&session.user_id, BASIC_30_CREDIT, duration)
                    .await?
            }
            other => other,
        };

        match outcome {
            DebitOutcome::Committed { credit_id } => Ok(credit_id),
            DebitOutcome::NoneAvailable => {
                warn!(session_id = %session.id, credit_type = %credit_type, "No credits available");
                Err(InterviewError::CreditsExhausted { credit_type })
            }
        }
    }

    /// Append a turn; refused once the session has left `in_progress`.
    async fn store(
        &self,
        session_id: &Uuid,
        role: MessageAuthor,
        content: &str,
    ) -> Result<InterviewMessage, InterviewError> {
        let message = InterviewMessage::new(*session_id, role, cap_content(content));
        let stored = self.messages.append_message(&message).await.map_err(|err| {
            error!(session_id = %session_id, error = %err, "Failed to store message");
            InterviewError::from(err)
        })?;
        stored.ok_or_else(|| {
            warn!(session_id = %session_id, role = %role, "Session left in_progress, turn discarded");
            InterviewError::InvalidState("interview is not in progress".to_string())
        })
    }

    async fn reload(&self, id: &Uuid) -> Result<InterviewSession, InterviewError> {
        self.sessions
            .get_session(id)
            .await?
            .ok_or_else(|| InterviewError::NotFound("interview".to_string()))
    }
}

fn require_status(session: &InterviewSession, expected: SessionStatus) -> Result<(), InterviewError> {
    if session.status == expected {
        Ok(())
    } else {
        Err(InterviewError::InvalidState(format!(
            "interview is {}, expected {expected}",
            session.status
        )))
    }
}

fn require_content(content: &str) -> Result<(), InterviewError> {
    if content.trim().is_empty() {
        return Err(InterviewError::Validation(
            "message content must not be empty".to_string(),
        ));
    }
    Ok(())
}

//! Storage ports for the interview service.
//!
//! The infrastructure layer (intervu-infra) implements these with SQLite.
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use intervu_types::credit::{Credit, DebitOutcome};
use intervu_types::error::RepositoryError;
use intervu_types::feedback::StoredFeedback;
use intervu_types::interview::InterviewSession;
use intervu_types::message::InterviewMessage;

/// Interview session persistence.
///
/// State transitions are conditional single-statement updates: they return
/// `false` when the session was not in the expected state, so concurrent
/// callers cannot both win.
pub trait SessionRepository: Send + Sync {
    fn create_session(
        &self,
        session: &InterviewSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_session(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<InterviewSession>, RepositoryError>> + Send;

    /// Sessions owned by a user, newest first.
    fn list_sessions_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<InterviewSession>, RepositoryError>> + Send;

    /// Every session, newest first.
    fn list_all_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<InterviewSession>, RepositoryError>> + Send;

    /// `created -> in_progress`, recording the debited credit.
    fn mark_started(
        &self,
        id: &Uuid,
        credit_id: &Uuid,
        start_time: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// `in_progress -> completed`.
    fn mark_completed(
        &self,
        id: &Uuid,
        end_time: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Flip `is_finishing` false -> true on an in-progress session.
    /// Returns `false` if it was already set (or the session is not in progress).
    fn mark_finishing(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    fn update_remaining_time(
        &self,
        id: &Uuid,
        remaining_time_ms: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a session together with its messages and feedback.
    /// Returns `false` if nothing was deleted.
    fn delete_session(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Transcript persistence.
///
/// Inserts are conditional on the session status, checked in the same
/// statement as the write, so a turn that finishes after the session ended
/// is never stored.
pub trait MessageRepository: Send + Sync {
    /// Insert a turn while the session is `in_progress`, assigning the next
    /// per-session `seq` atomically. Returns `None` (nothing stored) when the
    /// session is missing or in any other state.
    fn append_message(
        &self,
        message: &InterviewMessage,
    ) -> impl std::future::Future<Output = Result<Option<InterviewMessage>, RepositoryError>> + Send;

    /// Insert the closing statement. Only succeeds on a `completed` session.
    fn append_closing(
        &self,
        message: &InterviewMessage,
    ) -> impl std::future::Future<Output = Result<Option<InterviewMessage>, RepositoryError>> + Send;

    /// Replace the content of a message of `session_id` (used to fill
    /// streaming placeholders). `NotFound` if the id belongs elsewhere.
    fn update_message_content(
        &self,
        session_id: &Uuid,
        id: &Uuid,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages of a session ordered by `seq`.
    fn list_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<InterviewMessage>, RepositoryError>> + Send;
}

/// Interview credit balance.
pub trait CreditLedger: Send + Sync {
    /// Atomically take one unit from the soonest-expiring unexpired credit of
    /// `credit_type` that covers `min_duration_minutes` (if given).
    fn debit_one(
        &self,
        user_id: &Uuid,
        credit_type: &str,
        min_duration_minutes: Option<u32>,
    ) -> impl std::future::Future<Output = Result<DebitOutcome, RepositoryError>> + Send;

    /// Give back one unit to a credit batch.
    fn refund_one(
        &self,
        credit_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn grant(
        &self,
        credit: &Credit,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Credit batches of a user, soonest expiry first.
    fn list_credits(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Credit>, RepositoryError>> + Send;
}

/// Feedback persistence (at most one record per session).
pub trait FeedbackRepository: Send + Sync {
    fn get_feedback(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<StoredFeedback>, RepositoryError>> + Send;

    /// Insert unless feedback already exists for the session.
    /// Returns `false` when an existing record was kept.
    fn insert_feedback_if_absent(
        &self,
        feedback: &StoredFeedback,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Feedback for every session owned by a user, newest first.
    fn list_feedback_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<StoredFeedback>, RepositoryError>> + Send;
}

//! In-memory storage shared by service tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use intervu_types::credit::{Credit, DebitOutcome};
use intervu_types::error::RepositoryError;
use intervu_types::feedback::StoredFeedback;
use intervu_types::interview::{InterviewSession, SessionStatus};
use intervu_types::message::InterviewMessage;

use super::repository::{CreditLedger, FeedbackRepository, MessageRepository, SessionRepository};

#[derive(Default)]
struct State {
    sessions: Vec<InterviewSession>,
    messages: Vec<InterviewMessage>,
    credits: Vec<Credit>,
    feedback: Vec<StoredFeedback>,
}

/// One store behind all four ports, so cascades behave like the database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining_credits(&self, credit_type: &str) -> u32 {
        let state = self.state.lock().unwrap();
        state
            .credits
            .iter()
            .filter(|c| c.credit_type == credit_type)
            .map(|c| c.remaining)
            .sum()
    }

    pub fn message_count(&self, session_id: &Uuid) -> usize {
        let state = self.state.lock().unwrap();
        state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .count()
    }

    pub fn feedback_count(&self) -> usize {
        self.state.lock().unwrap().feedback.len()
    }
}

impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: &InterviewSession) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.sessions.iter().any(|s| s.id == session.id) {
            return Err(RepositoryError::Conflict("duplicate session id".to_string()));
        }
        state.sessions.push(session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<InterviewSession>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.sessions.iter().find(|s| s.id == *id).cloned())
    }

    async fn list_sessions_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<InterviewSession>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut sessions: Vec<_> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn list_all_sessions(&self) -> Result<Vec<InterviewSession>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut sessions = state.sessions.clone();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn mark_started(
        &self,
        id: &Uuid,
        credit_id: &Uuid,
        start_time: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        match state
            .sessions
            .iter_mut()
            .find(|s| s.id == *id && s.status == SessionStatus::Created)
        {
            Some(session) => {
                session.status = SessionStatus::InProgress;
                session.credit_id = Some(*credit_id);
                session.start_time = Some(start_time);
                session.updated_at = start_time;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_completed(
        &self,
        id: &Uuid,
        end_time: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        match state
            .sessions
            .iter_mut()
            .find(|s| s.id == *id && s.status == SessionStatus::InProgress)
        {
            Some(session) => {
                session.status = SessionStatus::Completed;
                session.end_time = Some(end_time);
                session.updated_at = end_time;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_finishing(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        match state.sessions.iter_mut().find(|s| {
            s.id == *id && s.status == SessionStatus::InProgress && !s.is_finishing
        }) {
            Some(session) => {
                session.is_finishing = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_remaining_time(
        &self,
        id: &Uuid,
        remaining_time_ms: i64,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        session.remaining_time_ms = Some(remaining_time_ms);
        session.last_time_update_at = Some(at);
        Ok(())
    }

    async fn delete_session(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != *id);
        state.messages.retain(|m| m.session_id != *id);
        state.feedback.retain(|f| f.session_id != *id);
        Ok(state.sessions.len() < before)
    }
}

impl MemoryStore {
    fn append_if(
        &self,
        message: &InterviewMessage,
        status: SessionStatus,
    ) -> Option<InterviewMessage> {
        let mut state = self.state.lock().unwrap();
        if !state
            .sessions
            .iter()
            .any(|s| s.id == message.session_id && s.status == status)
        {
            return None;
        }
        let seq = state
            .messages
            .iter()
            .filter(|m| m.session_id == message.session_id)
            .map(|m| m.seq)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = InterviewMessage {
            seq,
            ..message.clone()
        };
        state.messages.push(stored.clone());
        Some(stored)
    }
}

impl MessageRepository for MemoryStore {
    async fn append_message(
        &self,
        message: &InterviewMessage,
    ) -> Result<Option<InterviewMessage>, RepositoryError> {
        Ok(self.append_if(message, SessionStatus::InProgress))
    }

    async fn append_closing(
        &self,
        message: &InterviewMessage,
    ) -> Result<Option<InterviewMessage>, RepositoryError> {
        Ok(self.append_if(message, SessionStatus::Completed))
    }

    async fn update_message_content(
        &self,
        session_id: &Uuid,
        id: &Uuid,
        content: &str,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == *id && m.session_id == *session_id)
            .ok_or(RepositoryError::NotFound)?;
        message.content = content.to_string();
        Ok(())
    }

    async fn list_messages(&self, session_id: &Uuid) -> Result<Vec<InterviewMessage>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut messages: Vec<_> = state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.seq);
        Ok(messages)
    }
}

impl CreditLedger for MemoryStore {
    async fn debit_one(
        &self,
        user_id: &Uuid,
        credit_type: &str,
        min_duration_minutes: Option<u32>,
    ) -> Result<DebitOutcome, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let candidate = state
            .credits
            .iter_mut()
            .filter(|c| {
                c.user_id == *user_id
                    && c.credit_type == credit_type
                    && c.remaining > 0
                    && c.expires_at > now
                    && match (c.duration_minutes, min_duration_minutes) {
                        (Some(covers), Some(needed)) => covers >= needed,
                        _ => true,
                    }
            })
            .min_by_key(|c| c.expires_at);
        match candidate {
            Some(credit) => {
                credit.remaining -= 1;
                Ok(DebitOutcome::Committed {
                    credit_id: credit.id,
                })
            }
            None => Ok(DebitOutcome::NoneAvailable),
        }
    }

    async fn refund_one(&self, credit_id: &Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let credit = state
            .credits
            .iter_mut()
            .find(|c| c.id == *credit_id)
            .ok_or(RepositoryError::NotFound)?;
        credit.remaining += 1;
        Ok(())
    }

    async fn grant(&self, credit: &Credit) -> Result<(), RepositoryError> {
        self.state.lock().unwrap().credits.push(credit.clone());
        Ok(())
    }

    async fn list_credits(&self, user_id: &Uuid) -> Result<Vec<Credit>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut credits: Vec<_> = state
            .credits
            .iter()
            .filter(|c| c.user_id == *user_id)
            .cloned()
            .collect();
        credits.sort_by_key(|c| c.expires_at);
        Ok(credits)
    }
}

impl FeedbackRepository for MemoryStore {
    async fn get_feedback(&self, session_id: &Uuid) -> Result<Option<StoredFeedback>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .feedback
            .iter()
            .find(|f| f.session_id == *session_id)
            .cloned())
    }

    async fn insert_feedback_if_absent(&self, feedback: &StoredFeedback) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state
            .feedback
            .iter()
            .any(|f| f.session_id == feedback.session_id)
        {
            return Ok(false);
        }
        state.feedback.push(feedback.clone());
        Ok(true)
    }

    async fn list_feedback_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<StoredFeedback>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let owned: Vec<Uuid> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == *user_id)
            .map(|s| s.id)
            .collect();
        let mut feedback: Vec<_> = state
            .feedback
            .iter()
            .filter(|f| owned.contains(&f.session_id))
            .cloned()
            .collect();
        feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feedback)
    }
}

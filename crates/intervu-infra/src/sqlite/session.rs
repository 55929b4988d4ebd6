//! SQLite interview session repository.
//!
//! State transitions are single conditional UPDATEs on the writer pool; the
//! affected-row count tells the caller whether it won the transition.

use chrono::{DateTime, Utc};
use intervu_core::interview::repository::SessionRepository;
use intervu_types::error::RepositoryError;
use intervu_types::interview::{InterviewSession, InterviewSettings, SessionStatus};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `SessionRepository`.
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `InterviewSession`.
struct SessionRow {
    id: String,
    user_id: String,
    settings: String,
    status: String,
    duration_minutes: i64,
    start_time: Option<String>,
    end_time: Option<String>,
    remaining_time_ms: Option<i64>,
    last_time_update_at: Option<String>,
    is_finishing: bool,
    credit_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            settings: row.try_get("settings")?,
            status: row.try_get("status")?,
            duration_minutes: row.try_get("duration_minutes")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            remaining_time_ms: row.try_get("remaining_time_ms")?,
            last_time_update_at: row.try_get("last_time_update_at")?,
            is_finishing: row.try_get("is_finishing")?,
            credit_id: row.try_get("credit_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<InterviewSession, RepositoryError> {
        let settings: InterviewSettings = serde_json::from_str(&self.settings)
            .map_err(|e| RepositoryError::Query(format!("invalid settings json: {e}")))?;
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(InterviewSession {
            id: parse_uuid(&self.id, "session")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            settings,
            status,
            duration_minutes: u32::try_from(self.duration_minutes)
                .map_err(|e| RepositoryError::Query(format!("invalid duration: {e}")))?,
            start_time: self.start_time.as_deref().map(parse_datetime).transpose()?,
            end_time: self.end_time.as_deref().map(parse_datetime).transpose()?,
            remaining_time_ms: self.remaining_time_ms,
            last_time_update_at: self
                .last_time_update_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            is_finishing: self.is_finishing,
            credit_id: self
                .credit_id
                .as_deref()
                .map(|id| parse_uuid(id, "credit"))
                .transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn rows_to_sessions(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<InterviewSession>, RepositoryError> {
    rows.iter()
        .map(|row| SessionRow::from_row(row).map_err(query_error)?.into_session())
        .collect()
}

impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, session: &InterviewSession) -> Result<(), RepositoryError> {
        let settings_json = serde_json::to_string(&session.settings)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO interview_sessions (id, user_id, settings, credit_type, status, duration_minutes, start_time, end_time, remaining_time_ms, last_time_update_at, is_finishing, credit_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&settings_json)
        .bind(session.settings.credit_type())
        .bind(session.status.to_string())
        .bind(i64::from(session.duration_minutes))
        .bind(session.start_time.as_ref().map(format_datetime))
        .bind(session.end_time.as_ref().map(format_datetime))
        .bind(session.remaining_time_ms)
        .bind(session.last_time_update_at.as_ref().map(format_datetime))
        .bind(session.is_finishing)
        .bind(session.credit_id.map(|id| id.to_string()))
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("session '{}' already exists", session.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<InterviewSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM interview_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<InterviewSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM interview_sessions WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows_to_sessions(&rows)
    }

    async fn list_all_sessions(&self) -> Result<Vec<InterviewSession>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM interview_sessions ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows_to_sessions(&rows)
    }

    async fn mark_started(
        &self,
        id: &Uuid,
        credit_id: &Uuid,
        start_time: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_sessions
             SET status = 'in_progress', credit_id = ?, start_time = ?, updated_at = ?
             WHERE id = ? AND status = 'created'",
        )
        .bind(credit_id.to_string())
        .bind(format_datetime(&start_time))
        .bind(format_datetime(&start_time))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_completed(
        &self,
        id: &Uuid,
        end_time: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_sessions
             SET status = 'completed', end_time = ?, updated_at = ?
             WHERE id = ? AND status = 'in_progress'",
        )
        .bind(format_datetime(&end_time))
        .bind(format_datetime(&end_time))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_finishing(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_sessions
             SET is_finishing = 1, updated_at = ?
             WHERE id = ? AND status = 'in_progress' AND is_finishing = 0",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_remaining_time(
        &self,
        id: &Uuid,
        remaining_time_ms: i64,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_sessions
             SET remaining_time_ms = ?, last_time_update_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(remaining_time_ms)
        .bind(format_datetime(&at))
        .bind(format_datetime(&at))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_session(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        // Messages and feedback go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM interview_sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

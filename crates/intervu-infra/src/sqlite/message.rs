//! SQLite transcript repository.

use intervu_core::interview::repository::MessageRepository;
use intervu_types::error::RepositoryError;
use intervu_types::interview::SessionStatus;
use intervu_types::message::{InterviewMessage, MessageAuthor};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: String,
    session_id: String,
    seq: i64,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            seq: row.try_get("seq")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<InterviewMessage, RepositoryError> {
        let role: MessageAuthor = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        Ok(InterviewMessage {
            id: parse_uuid(&self.id, "message")?,
            session_id: parse_uuid(&self.session_id, "session")?,
            seq: self.seq,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SqliteMessageRepository {
    /// Insert only while the session has `status`. The status check and the
    /// next seq are evaluated inside the INSERT on the single writer
    /// connection, so neither can change between check and write.
    async fn append_if_status(
        &self,
        message: &InterviewMessage,
        status: SessionStatus,
    ) -> Result<Option<InterviewMessage>, RepositoryError> {
        let session_id = message.session_id.to_string();
        let row = sqlx::query(
            "INSERT INTO interview_messages (id, session_id, seq, role, content, created_at)
             SELECT ?, ?,
                    (SELECT COALESCE(MAX(seq), 0) + 1 FROM interview_messages WHERE session_id = ?),
                    ?, ?, ?
             WHERE EXISTS (SELECT 1 FROM interview_sessions WHERE id = ? AND status = ?)
             RETURNING seq",
        )
        .bind(message.id.to_string())
        .bind(&session_id)
        .bind(&session_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .bind(&session_id)
        .bind(status.to_string())
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let seq: i64 = row.try_get("seq").map_err(query_error)?;
                Ok(Some(InterviewMessage {
                    seq,
                    ..message.clone()
                }))
            }
            None => Ok(None),
        }
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn append_message(
        &self,
        message: &InterviewMessage,
    ) -> Result<Option<InterviewMessage>, RepositoryError> {
        self.append_if_status(message, SessionStatus::InProgress).await
    }

    async fn append_closing(
        &self,
        message: &InterviewMessage,
    ) -> Result<Option<InterviewMessage>, RepositoryError> {
        self.append_if_status(message, SessionStatus::Completed).await
    }

    async fn update_message_content(
        &self,
        session_id: &Uuid,
        id: &Uuid,
        content: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_messages SET content = ? WHERE id = ? AND session_id = ?",
        )
        .bind(content)
        .bind(id.to_string())
        .bind(session_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_messages(&self, session_id: &Uuid) -> Result<Vec<InterviewMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM interview_messages WHERE session_id = ? ORDER BY seq ASC")
            .bind(session_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| MessageRow::from_row(row).map_err(query_error)?.into_message())
            .collect()
    }
}

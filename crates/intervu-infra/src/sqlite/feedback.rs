//! SQLite feedback repository (one record per session).

use intervu_core::interview::repository::FeedbackRepository;
use intervu_types::error::RepositoryError;
use intervu_types::feedback::{FeedbackItem, FeedbackResult, StoredFeedback};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `FeedbackRepository`.
#[derive(Clone)]
pub struct SqliteFeedbackRepository {
    pool: DatabasePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct FeedbackRow {
    id: String,
    session_id: String,
    overall_score: i64,
    overall_comment: String,
    feedback_items: String,
    strengths: String,
    areas_to_improve: String,
    created_at: String,
}

impl FeedbackRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            overall_score: row.try_get("overall_score")?,
            overall_comment: row.try_get("overall_comment")?,
            feedback_items: row.try_get("feedback_items")?,
            strengths: row.try_get("strengths")?,
            areas_to_improve: row.try_get("areas_to_improve")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_feedback(self) -> Result<StoredFeedback, RepositoryError> {
        let json_err = |e: serde_json::Error| RepositoryError::Query(format!("invalid feedback json: {e}"));
        let feedback_items: Vec<FeedbackItem> =
            serde_json::from_str(&self.feedback_items).map_err(json_err)?;
        let strengths: Vec<String> = serde_json::from_str(&self.strengths).map_err(json_err)?;
        let areas_to_improve: Vec<String> =
            serde_json::from_str(&self.areas_to_improve).map_err(json_err)?;

        Ok(StoredFeedback {
            id: parse_uuid(&self.id, "feedback")?,
            session_id: parse_uuid(&self.session_id, "session")?,
            result: FeedbackResult {
                overall_score: u8::try_from(self.overall_score)
                    .map_err(|e| RepositoryError::Query(format!("invalid score: {e}")))?,
                overall_comment: self.overall_comment,
                feedback_items,
                strengths,
                areas_to_improve,
            },
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl FeedbackRepository for SqliteFeedbackRepository {
    async fn get_feedback(&self, session_id: &Uuid) -> Result<Option<StoredFeedback>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM interview_feedback WHERE session_id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(
                FeedbackRow::from_row(&row).map_err(query_error)?.into_feedback()?,
            )),
            None => Ok(None),
        }
    }

    async fn insert_feedback_if_absent(&self, feedback: &StoredFeedback) -> Result<bool, RepositoryError> {
        let result = &feedback.result;
        let outcome = sqlx::query(
            "INSERT INTO interview_feedback (id, session_id, overall_score, overall_comment, feedback_items, strengths, areas_to_improve, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(session_id) DO NOTHING",
        )
        .bind(feedback.id.to_string())
        .bind(feedback.session_id.to_string())
        .bind(i64::from(result.overall_score))
        .bind(&result.overall_comment)
        .bind(to_json(&result.feedback_items)?)
        .bind(to_json(&result.strengths)?)
        .bind(to_json(&result.areas_to_improve)?)
        .bind(format_datetime(&feedback.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(outcome.rows_affected() == 1)
    }

    async fn list_feedback_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<StoredFeedback>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT f.* FROM interview_feedback f
             JOIN interview_sessions s ON s.id = f.session_id
             WHERE s.user_id = ?
             ORDER BY f.created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| FeedbackRow::from_row(row).map_err(query_error)?.into_feedback())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use crate::sqlite::session::SqliteSessionRepository;
    use intervu_core::interview::repository::SessionRepository;
    use intervu_types::interview::{InterviewSession, InterviewSettings, InterviewType};

    fn result(score: u8) -> FeedbackResult {
        FeedbackResult {
            overall_score: score,
            overall_comment: "Good structure.".to_string(),
            feedback_items: vec![FeedbackItem {
                category: "structure".to_string(),
                score,
                comment: "Used STAR consistently.".to_string(),
                improvement_suggestion: "Quantify results.".to_string(),
            }],
            strengths: vec!["Storytelling".to_string()],
            areas_to_improve: vec!["Metrics".to_string()],
        }
    }

    async fn setup() -> (SqliteFeedbackRepository, SqliteSessionRepository, tempfile::TempDir) {
        let (pool, dir) = test_pool().await;
        (
            SqliteFeedbackRepository::new(pool.clone()),
            SqliteSessionRepository::new(pool),
            dir,
        )
    }

    async fn new_session(sessions: &SqliteSessionRepository, user: Uuid) -> Uuid {
        let session = InterviewSession::new(
            user,
            InterviewSettings::basic("Engineer", InterviewType::Behavioral),
        );
        sessions.create_session(&session).await.unwrap();
        session.id
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (repo, sessions, _dir) = setup().await;
        let session_id = new_session(&sessions, Uuid::now_v7()).await;
        let stored = StoredFeedback::new(session_id, result(4));

        assert!(repo.insert_feedback_if_absent(&stored).await.unwrap());
        let fetched = repo.get_feedback(&session_id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.result, stored.result);
    }

    #[tokio::test]
    async fn test_second_insert_keeps_first() {
        let (repo, sessions, _dir) = setup().await;
        let session_id = new_session(&sessions, Uuid::now_v7()).await;

        assert!(repo
            .insert_feedback_if_absent(&StoredFeedback::new(session_id, result(4)))
            .await
            .unwrap());
        assert!(!repo
            .insert_feedback_if_absent(&StoredFeedback::new(session_id, result(1)))
            .await
            .unwrap());

        let fetched = repo.get_feedback(&session_id).await.unwrap().unwrap();
        assert_eq!(fetched.result.overall_score, 4);
    }

    #[tokio::test]
    async fn test_list_for_user_and_cascade() {
        let (repo, sessions, _dir) = setup().await;
        let alice = Uuid::now_v7();
        let a1 = new_session(&sessions, alice).await;
        let a2 = new_session(&sessions, alice).await;
        let bob_session = new_session(&sessions, Uuid::now_v7()).await;
        for id in [a1, a2, bob_session] {
            repo.insert_feedback_if_absent(&StoredFeedback::new(id, result(3)))
                .await
                .unwrap();
        }

        assert_eq!(repo.list_feedback_for_user(&alice).await.unwrap().len(), 2);

        sessions.delete_session(&a1).await.unwrap();
        assert!(repo.get_feedback(&a1).await.unwrap().is_none());
        assert_eq!(repo.list_feedback_for_user(&alice).await.unwrap().len(), 1);
    }
}

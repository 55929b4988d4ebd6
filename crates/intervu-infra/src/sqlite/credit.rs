//! SQLite credit ledger.
//!
//! A debit is one `UPDATE ... RETURNING` that picks the soonest-expiring
//! eligible batch in a subquery and re-checks `remaining > 0`, so concurrent
//! starts can never take the same last unit.

use chrono::Utc;
use intervu_core::interview::repository::CreditLedger;
use intervu_types::credit::{Credit, DebitOutcome};
use intervu_types::error::RepositoryError;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `CreditLedger`.
#[derive(Clone)]
pub struct SqliteCreditLedger {
    pool: DatabasePool,
}

impl SqliteCreditLedger {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CreditRow {
    id: String,
    user_id: String,
    credit_type: String,
    duration_minutes: Option<i64>,
    remaining: i64,
    expires_at: String,
    created_at: String,
    updated_at: String,
}

impl CreditRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            credit_type: row.try_get("credit_type")?,
            duration_minutes: row.try_get("duration_minutes")?,
            remaining: row.try_get("remaining")?,
            expires_at: row.try_get("expires_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_credit(self) -> Result<Credit, RepositoryError> {
        let to_u32 = |v: i64| {
            u32::try_from(v).map_err(|e| RepositoryError::Query(format!("invalid credit count: {e}")))
        };
        Ok(Credit {
            id: parse_uuid(&self.id, "credit")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            credit_type: self.credit_type,
            duration_minutes: self.duration_minutes.map(to_u32).transpose()?,
            remaining: to_u32(self.remaining)?,
            expires_at: parse_datetime(&self.expires_at)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl CreditLedger for SqliteCreditLedger {
    async fn debit_one(
        &self,
        user_id: &Uuid,
        credit_type: &str,
        min_duration_minutes: Option<u32>,
    ) -> Result<DebitOutcome, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let min_duration = min_duration_minutes.map(i64::from);

        let row = sqlx::query(
            "UPDATE interview_credits
             SET remaining = remaining - 1, updated_at = ?
             WHERE remaining > 0 AND id = (
                 SELECT id FROM interview_credits
                 WHERE user_id = ? AND credit_type = ? AND remaining > 0 AND expires_at > ?
                   AND (? IS NULL OR duration_minutes IS NULL OR duration_minutes >= ?)
                 ORDER BY expires_at ASC, created_at ASC
                 LIMIT 1
             )
             RETURNING id",
        )
        .bind(&now)
        .bind(user_id.to_string())
        .bind(credit_type)
        .bind(&now)
        .bind(min_duration)
        .bind(min_duration)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let id: String = row.try_get("id").map_err(query_error)?;
                let credit_id = parse_uuid(&id, "credit")?;
                debug!(user_id = %user_id, credit_type, credit_id = %credit_id, "Credit debited");
                Ok(DebitOutcome::Committed { credit_id })
            }
            None => Ok(DebitOutcome::NoneAvailable),
        }
    }

    async fn refund_one(&self, credit_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE interview_credits SET remaining = remaining + 1, updated_at = ? WHERE id = ?",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(credit_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn grant(&self, credit: &Credit) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO interview_credits (id, user_id, credit_type, duration_minutes, remaining, expires_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(credit.id.to_string())
        .bind(credit.user_id.to_string())
        .bind(&credit.credit_type)
        .bind(credit.duration_minutes.map(i64::from))
        .bind(i64::from(credit.remaining))
        .bind(format_datetime(&credit.expires_at))
        .bind(format_datetime(&credit.created_at))
        .bind(format_datetime(&credit.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn list_credits(&self, user_id: &Uuid) -> Result<Vec<Credit>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM interview_credits WHERE user_id = ? ORDER BY expires_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| CreditRow::from_row(row).map_err(query_error)?.into_credit())
            .collect()
    }
}

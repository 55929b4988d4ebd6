//! Interview credits consumed when a session starts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A batch of purchased or granted interview units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credit {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Credit key, e.g. `specialized` or `basic_15min`.
    pub credit_type: String,
    pub duration_minutes: Option<u32>,
    pub remaining: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credit {
    /// A new credit batch valid for `valid_for` from now.
    pub fn grant(
        user_id: Uuid,
        credit_type: impl Into<String>,
        quantity: u32,
        duration_minutes: Option<u32>,
        valid_for: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            credit_type: credit_type.into(),
            duration_minutes,
            remaining: quantity,
            expires_at: now + valid_for,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of an atomic debit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// One unit was taken from this credit batch.
    Committed { credit_id: Uuid },
    /// No eligible, unexpired credit with units left.
    NoneAvailable,
}

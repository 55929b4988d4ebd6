//! Structured interview feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scored aspect of the candidate's performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub category: String,
    pub score: u8,
    pub comment: String,
    pub improvement_suggestion: String,
}

/// Feedback as extracted from the model's JSON answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub overall_score: u8,
    pub overall_comment: String,
    #[serde(default)]
    pub feedback_items: Vec<FeedbackItem>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_to_improve: Vec<String>,
}

impl FeedbackResult {
    /// Reject scores outside 1..=5 instead of clamping them.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.overall_score) {
            return Err(format!(
                "overall_score must be between 1 and 5, got {}",
                self.overall_score
            ));
        }
        for item in &self.feedback_items {
            if !(1..=5).contains(&item.score) {
                return Err(format!(
                    "score for category '{}' must be between 1 and 5, got {}",
                    item.category, item.score
                ));
            }
        }
        Ok(())
    }
}

/// Feedback persisted for a completed session (at most one per session).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFeedback {
    pub id: Uuid,
    pub session_id: Uuid,
    #[serde(flatten)]
    pub result: FeedbackResult,
    pub created_at: DateTime<Utc>,
}

impl StoredFeedback {
    pub fn new(session_id: Uuid, result: FeedbackResult) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            result,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeedbackResult {
        FeedbackResult {
            overall_score: 4,
            overall_comment: "Solid answers".to_string(),
            feedback_items: vec![FeedbackItem {
                category: "clarity".to_string(),
                score: 4,
                comment: "Clear".to_string(),
                improvement_suggestion: "Use more examples".to_string(),
            }],
            strengths: vec!["Communication".to_string()],
            areas_to_improve: vec![],
        }
    }

    #[test]
    fn test_validate_accepts_in_range() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut fb = sample();
        fb.overall_score = 0;
        assert!(fb.validate().is_err());

        let mut fb = sample();
        fb.feedback_items[0].score = 9;
        let err = fb.validate().unwrap_err();
        assert!(err.contains("clarity"));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = r#"{"overall_score": 3, "overall_comment": "ok"}"#;
        let fb: FeedbackResult = serde_json::from_str(json).unwrap();
        assert!(fb.feedback_items.is_empty());
        assert!(fb.strengths.is_empty());
    }

    #[test]
    fn test_stored_feedback_flattens_result() {
        let stored = StoredFeedback::new(Uuid::now_v7(), sample());
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["overall_score"], 4);
        assert!(value.get("result").is_none());
    }
}

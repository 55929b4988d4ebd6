use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in intervu-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the interview service and engine.
///
/// Each variant maps to exactly one HTTP status in the API layer.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("access denied")]
    Forbidden,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("no interview credits available for '{credit_type}'")]
    CreditsExhausted { credit_type: String },

    #[error("feedback already exists for this interview")]
    FeedbackExists,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("upstream model error: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<LlmError> for InterviewError {
    fn from(err: LlmError) -> Self {
        InterviewError::Upstream(err.to_string())
    }
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("missing required setting: {0}")]
    Missing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_converts() {
        let err: InterviewError = RepositoryError::Query("boom".into()).into();
        assert!(matches!(err, InterviewError::Repository(_)));
        assert_eq!(err.to_string(), "query error: boom");
    }

    #[test]
    fn test_llm_error_is_upstream() {
        let err: InterviewError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, InterviewError::Upstream(ref m) if m == "authentication failed"));
    }

    #[test]
    fn test_credits_exhausted_names_type() {
        let err = InterviewError::CreditsExhausted {
            credit_type: "basic_15min".to_string(),
        };
        assert!(err.to_string().contains("basic_15min"));
    }
}

//! Extraction of structured feedback from raw model output.

use intervu_types::feedback::FeedbackResult;

/// Why model output could not be turned into feedback.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackParseError {
    #[error("feedback is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feedback failed validation: {0}")]
    Invalid(String),
}

/// Strip an optional Markdown code fence around a JSON payload.
///
/// Accepts a ```` ```json ```` fence, a bare ```` ``` ```` fence, or no fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let (body, opened) = if let Some((_, rest)) = raw.split_once("```json") {
        (rest, true)
    } else if let Some((_, rest)) = raw.split_once("```") {
        (rest, true)
    } else {
        (raw, false)
    };

    if !opened {
        return raw.trim();
    }
    match body.split_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(),
    }
}

/// Parse and validate the model's feedback answer. Never coerces.
pub fn parse_feedback(raw: &str) -> Result<FeedbackResult, FeedbackParseError> {
    let result: FeedbackResult = serde_json::from_str(strip_code_fence(raw))?;
    result.validate().map_err(FeedbackParseError::Invalid)?;
    Ok(result)
}

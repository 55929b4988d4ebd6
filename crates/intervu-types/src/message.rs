//! Transcript message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Who spoke a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageAuthor {
    /// The AI interviewer.
    Interviewer,
    /// The human candidate.
    Candidate,
}

impl MessageAuthor {
    /// Capitalized label used when rendering a transcript ("Interviewer").
    pub fn label(&self) -> &'static str {
        match self {
            MessageAuthor::Interviewer => "Interviewer",
            MessageAuthor::Candidate => "Candidate",
        }
    }
}

impl fmt::Display for MessageAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageAuthor::Interviewer => write!(f, "interviewer"),
            MessageAuthor::Candidate => write!(f, "candidate"),
        }
    }
}

impl FromStr for MessageAuthor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interviewer" => Ok(MessageAuthor::Interviewer),
            "candidate" => Ok(MessageAuthor::Candidate),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One line of an interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Position within the session, assigned by the message store on insert.
    pub seq: i64,
    pub role: MessageAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl InterviewMessage {
    /// A message not yet persisted; `seq` is filled in by the store.
    pub fn new(session_id: Uuid, role: MessageAuthor, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            seq: 0,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// True for a streaming placeholder that never received text.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_roundtrip() {
        for author in [MessageAuthor::Interviewer, MessageAuthor::Candidate] {
            let parsed: MessageAuthor = author.to_string().parse().unwrap();
            assert_eq!(parsed, author);
        }
        assert!("assistant".parse::<MessageAuthor>().is_err());
    }

    #[test]
    fn test_blank_message() {
        let session = Uuid::now_v7();
        assert!(InterviewMessage::new(session, MessageAuthor::Interviewer, "").is_blank());
        assert!(InterviewMessage::new(session, MessageAuthor::Interviewer, " \n").is_blank());
        assert!(!InterviewMessage::new(session, MessageAuthor::Candidate, "Hi").is_blank());
    }

    #[test]
    fn test_author_serde_lowercase() {
        let json = serde_json::to_string(&MessageAuthor::Candidate).unwrap();
        assert_eq!(json, "\"candidate\"");
    }

    #[test]
    fn test_new_message_unsequenced() {
        let session = Uuid::now_v7();
        let msg = InterviewMessage::new(session, MessageAuthor::Interviewer, "Hello");
        assert_eq!(msg.seq, 0);
        assert_eq!(msg.session_id, session);
        assert_eq!(msg.role.label(), "Interviewer");
    }
}

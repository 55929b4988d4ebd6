//! JSON frames exchanged over the realtime interview socket.
//!
//! Both directions are tagged by `type` in snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Frame sent by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// A candidate turn.
    Message { content: String },
    /// Client clock tick, in milliseconds left.
    TimeUpdate { remaining_time: i64 },
    /// Keep-alive.
    Ping,
}

/// Frame sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Connected {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    ResponseChunk {
        content: String,
        is_complete: bool,
        message_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    ResponseComplete {
        message_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    TimeUpdateSuccess {
        remaining_time: i64,
        timestamp: DateTime<Utc>,
    },
    TimeRunningOut {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
    },
    Pong,
}

impl ServerFrame {
    pub fn chunk(content: String, message_id: Uuid) -> Self {
        ServerFrame::ResponseChunk {
            content,
            is_complete: false,
            message_id,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerFrame::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_frames() {
        let msg: ClientFrame =
            serde_json::from_str(r#"{"type":"message","content":"I used Rust."}"#).unwrap();
        assert_eq!(
            msg,
            ClientFrame::Message {
                content: "I used Rust.".to_string()
            }
        );

        let tick: ClientFrame =
            serde_json::from_str(r#"{"type":"time_update","remaining_time":180000}"#).unwrap();
        assert_eq!(
            tick,
            ClientFrame::TimeUpdate {
                remaining_time: 180_000
            }
        );

        let ping: ClientFrame = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(ping, ClientFrame::Ping);
    }

    #[test]
    fn test_unknown_client_frame_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"pause"}"#).is_err());
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"message"}"#).is_err());
    }

    #[test]
    fn test_chunk_frame_shape() {
        let id = Uuid::now_v7();
        let json = serde_json::to_value(ServerFrame::chunk("Hello.".to_string(), id)).unwrap();
        assert_eq!(json["type"], "response_chunk");
        assert_eq!(json["content"], "Hello.");
        assert_eq!(json["is_complete"], false);
        assert_eq!(json["message_id"], id.to_string());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_simple_frames() {
        assert_eq!(
            serde_json::to_value(ServerFrame::Pong).unwrap(),
            serde_json::json!({"type": "pong"})
        );
        assert_eq!(
            serde_json::to_value(ServerFrame::error("nope")).unwrap(),
            serde_json::json!({"type": "error", "message": "nope"})
        );
    }
}

//! Realtime interview gateway.
//!
//! `GET /api/v1/interviews/ws/{id}` upgrades to a WebSocket bound to one
//! in-progress session. The handler:
//!
//! - **Streams replies:** each candidate `message` frame is answered with
//!   speech-sized `response_chunk` frames followed by `response_complete`.
//! - **Tracks the clock:** `time_update` frames are persisted roughly every
//!   30 seconds, and crossing the three-minute mark triggers the wrap-up
//!   question, broadcast to every socket in the session's room.
//!
//! The model stream is drained in its own task. Disconnecting mid-reply
//! does **not** abort generation; the full reply is still persisted.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri};
use axum::response::IntoResponse;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use intervu_core::interview::chunker::SpeechChunker;
use intervu_core::interview::clock::{crosses_time_warning, should_persist_remaining_time};
use intervu_core::interview::service::{Caller, StreamingReply};
use intervu_types::error::InterviewError;
use intervu_types::interview::SessionStatus;

use crate::http::error::AppError;
use crate::http::extractors::auth::extract_token;
use crate::http::frames::{ClientFrame, ServerFrame};
use crate::http::handlers::interview::parse_interview_id;
use crate::state::{AppState, ConcreteInterviewService};

/// Frames buffered between a reply task and its socket.
const REPLY_BUFFER: usize = 64;

/// Upgrade an HTTP request to a realtime interview connection.
///
/// Authentication happens after the upgrade so a rejection can be reported
/// as an `error` frame before the socket closes.
pub async fn interview_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> impl IntoResponse {
    let token = extract_token(&headers, &uri);
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, id, token))
}

async fn handle_ws_connection(
    socket: WebSocket,
    state: AppState,
    raw_id: String,
    token: Result<String, AppError>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (caller, session_id) = match admit(&state, &raw_id, token).await {
        Ok(admitted) => admitted,
        Err(err) => {
            info!(session = %raw_id, reason = %err.message(), "Realtime connection rejected");
            let _ = send_frame(&mut ws_sender, &ServerFrame::error(err.message())).await;
            let _ = ws_sender.send(Message::Close(None)).await;
            return;
        }
    };

    let mut room_rx = state.rooms.join(session_id);
    let (reply_tx, mut reply_rx) = mpsc::channel(REPLY_BUFFER);
    let connection = SessionConnection {
        state: state.clone(),
        caller,
        session_id,
        replies: reply_tx,
    };

    info!(
        session_id = %session_id,
        user_id = %caller.user_id,
        members = state.rooms.member_count(&session_id),
        "Realtime connection opened"
    );
    let connected = ServerFrame::Connected {
        session_id,
        timestamp: Utc::now(),
    };

    if send_frame(&mut ws_sender, &connected).await.is_ok() {
        'conn: loop {
            tokio::select! {
                // Reply chunks from this connection's generation tasks
                Some(frame) = reply_rx.recv() => {
                    if send_frame(&mut ws_sender, &frame).await.is_err() {
                        break;
                    }
                }

                // Session-wide frames
                room_result = room_rx.recv() => {
                    match room_result {
                        Ok(frame) => {
                            if send_frame(&mut ws_sender, &frame).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(session_id = %session_id, skipped = n, "Realtime subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                // Client frames
                msg_result = ws_receiver.next() => {
                    match msg_result {
                        Some(Ok(Message::Text(text))) => {
                            for frame in connection.handle_text(&text).await {
                                if send_frame(&mut ws_sender, &frame).await.is_err() {
                                    break 'conn;
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(err)) => {
                            debug!("WebSocket receive error: {err}");
                            break;
                        }
                        // Binary and protocol-level ping/pong frames
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }

    drop(room_rx);
    state.rooms.leave(&session_id);
    info!(session_id = %session_id, "Realtime connection closed");
}

/// Authenticate the caller and check the session accepts realtime traffic.
async fn admit(
    state: &AppState,
    raw_id: &str,
    token: Result<String, AppError>,
) -> Result<(Caller, Uuid), AppError> {
    let caller = state.token_verifier.verify(&token?)?;
    let session_id = parse_interview_id(raw_id)?;
    let session = state.interview_service.get(&caller, &session_id).await?;
    if session.status != SessionStatus::InProgress {
        return Err(InterviewError::InvalidState("interview is not in progress".to_string()).into());
    }
    Ok((caller, session_id))
}

/// Per-socket frame handling, independent of the socket itself.
struct SessionConnection {
    state: AppState,
    caller: Caller,
    session_id: Uuid,
    replies: mpsc::Sender<ServerFrame>,
}

impl SessionConnection {
    /// Handle one text frame; returns the frames to send back immediately.
    async fn handle_text(&self, text: &str) -> Vec<ServerFrame> {
        match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => self.handle_frame(frame).await,
            Err(err) => {
                warn!(session_id = %self.session_id, error = %err, "Malformed realtime frame");
                vec![ServerFrame::error("Unrecognized frame")]
            }
        }
    }

    async fn handle_frame(&self, frame: ClientFrame) -> Vec<ServerFrame> {
        match frame {
            ClientFrame::Message { content } => self.handle_message(&content).await,
            ClientFrame::TimeUpdate { remaining_time } => self.handle_time_update(remaining_time).await,
            ClientFrame::Ping => vec![ServerFrame::Pong],
        }
    }

    async fn handle_message(&self, content: &str) -> Vec<ServerFrame> {
        if content.trim().is_empty() {
            return vec![ServerFrame::error("Message content cannot be empty")];
        }

        let service = &self.state.interview_service;
        match service
            .respond_streaming(&self.caller, &self.session_id, content)
            .await
        {
            Ok(reply) => {
                tokio::spawn(drain_reply(
                    Arc::clone(service),
                    self.caller,
                    self.session_id,
                    reply,
                    self.replies.clone(),
                ));
                Vec::new()
            }
            Err(err) => vec![ServerFrame::error(AppError::from(err).message())],
        }
    }

    async fn handle_time_update(&self, remaining_time: i64) -> Vec<ServerFrame> {
        let service = &self.state.interview_service;
        let mut frames = Vec::new();

        if should_persist_remaining_time(remaining_time) {
            if let Err(err) = service
                .update_remaining_time(&self.caller, &self.session_id, remaining_time)
                .await
            {
                frames.push(ServerFrame::error(AppError::from(err).message()));
            }
        }

        if crosses_time_warning(remaining_time) {
            match service
                .handle_time_running_out(&self.caller, &self.session_id)
                .await
            {
                Ok(Some(message)) => {
                    let delivered = self.state.rooms.broadcast(
                        &self.session_id,
                        ServerFrame::TimeRunningOut {
                            message: message.content,
                            timestamp: Utc::now(),
                        },
                    );
                    debug!(session_id = %self.session_id, delivered, "Wrap-up question broadcast");
                }
                Ok(None) => {}
                Err(err) => frames.push(ServerFrame::error(AppError::from(err).message())),
            }
        }

        frames.push(ServerFrame::TimeUpdateSuccess {
            remaining_time,
            timestamp: Utc::now(),
        });
        frames
    }
}

/// Drain a reply stream to completion, re-chunking it for speech and
/// persisting the full text into its placeholder.
///
/// Send failures (the socket went away) are ignored so the stream is always
/// consumed and the reply always stored.
async fn drain_reply(
    service: Arc<ConcreteInterviewService>,
    caller: Caller,
    session_id: Uuid,
    reply: StreamingReply,
    frames: mpsc::Sender<ServerFrame>,
) {
    let StreamingReply {
        message_id,
        mut stream,
        ..
    } = reply;
    let mut chunker = SpeechChunker::new();
    let mut full = String::new();
    let mut failure = None;

    while let Some(delta) = stream.next().await {
        match delta {
            Ok(text) => {
                full.push_str(&text);
                for chunk in chunker.push(&text) {
                    let _ = frames.send(ServerFrame::chunk(chunk, message_id)).await;
                }
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Reply stream failed");
                failure = Some(AppError::from(InterviewError::from(err)));
                break;
            }
        }
    }
    if let Some(rest) = chunker.finish() {
        let _ = frames.send(ServerFrame::chunk(rest, message_id)).await;
    }

    if let Err(err) = service
        .finish_streaming_reply(&caller, &session_id, &message_id, &full)
        .await
    {
        error!(session_id = %session_id, message_id = %message_id, error = %err, "Failed to persist streamed reply");
        failure.get_or_insert(AppError::from(err));
    }

    let last = match failure {
        None => ServerFrame::ResponseComplete {
            message_id,
            timestamp: Utc::now(),
        },
        Some(err) => ServerFrame::error(err.message()),
    };
    let _ = frames.send(last).await;
}

async fn send_frame(
    ws_sender: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    frame: &ServerFrame,
) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => ws_sender.send(Message::Text(json.into())).await,
        Err(err) => {
            warn!("Failed to serialize ServerFrame: {err}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::Json;
    use intervu_types::interview::{InterviewSettings, InterviewType, Language};
    use intervu_types::message::MessageAuthor;

    use crate::http::extractors::auth::{AuthUser, far_future, sign_test_token};
    use crate::http::handlers::interview::{create_interview, start_interview};
    use intervu_core::testing::ScriptedProvider;
    use intervu_types::llm::MessageRole;

    use crate::testing::{JWT_SECRET, grant_credits, new_caller, test_state_with};

    /// A started session and a connection bound to it.
    async fn connected(
        replies: &[&str],
    ) -> (
        SessionConnection,
        mpsc::Receiver<ServerFrame>,
        tempfile::TempDir,
    ) {
        connected_with(ScriptedProvider::with_replies(replies)).await
    }

    async fn connected_with(
        provider: ScriptedProvider,
    ) -> (
        SessionConnection,
        mpsc::Receiver<ServerFrame>,
        tempfile::TempDir,
    ) {
        let (state, dir) = test_state_with(provider).await;
        let caller = new_caller();
        grant_credits(&state, &caller, "basic_15min", 1).await;

        let mut settings = InterviewSettings::basic("Site Reliability Engineer", InterviewType::Technical);
        settings.language = Some(Language::EnUs);
        let session = create_interview(State(state.clone()), AuthUser(caller), Json(settings))
            .await
            .unwrap()
            .data;
        start_interview(
            State(state.clone()),
            AuthUser(caller),
            Path(session.id.to_string()),
        )
        .await
        .unwrap();

        let (tx, rx) = mpsc::channel(REPLY_BUFFER);
        let connection = SessionConnection {
            state,
            caller,
            session_id: session.id,
            replies: tx,
        };
        (connection, rx, dir)
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let (conn, _rx, _dir) = connected(&["Opening."]).await;
        assert_eq!(conn.handle_text(r#"{"type":"ping"}"#).await, vec![ServerFrame::Pong]);
    }

    #[tokio::test]
    async fn test_malformed_and_empty_frames() {
        let (conn, _rx, _dir) = connected(&["Opening."]).await;
        let frames = conn.handle_text("not json").await;
        assert!(matches!(frames.as_slice(), [ServerFrame::Error { .. }]));

        let frames = conn.handle_text(r#"{"type":"message","content":"   "}"#).await;
        assert_eq!(
            frames,
            vec![ServerFrame::error("Message content cannot be empty")]
        );
    }

    #[tokio::test]
    async fn test_message_streams_chunks_then_complete() {
        let (conn, mut rx, _dir) = connected(&[
            "Opening.",
            "Great answer. How did you handle failover? Tell me more",
        ])
        .await;

        let immediate = conn
            .handle_text(r#"{"type":"message","content":"I ran the on-call rotation."}"#)
            .await;
        assert!(immediate.is_empty());

        let mut chunks = Vec::new();
        let complete_id = loop {
            match rx.recv().await.unwrap() {
                ServerFrame::ResponseChunk {
                    content,
                    is_complete,
                    ..
                } => {
                    assert!(!is_complete);
                    chunks.push(content);
                }
                ServerFrame::ResponseComplete { message_id, .. } => break message_id,
                other => panic!("unexpected frame: {other:?}"),
            }
        };
        assert_eq!(
            chunks.concat(),
            "Great answer. How did you handle failover? Tell me more"
        );
        assert_eq!(chunks[0], "Great answer.");

        let transcript = conn
            .state
            .interview_service
            .messages(&conn.caller, &conn.session_id)
            .await
            .unwrap();
        let candidate: Vec<_> = transcript
            .iter()
            .filter(|m| m.role == MessageAuthor::Candidate)
            .collect();
        assert_eq!(candidate.len(), 1);
        let last = transcript.last().unwrap();
        assert_eq!(last.id, complete_id);
        assert_eq!(last.content, "Great answer. How did you handle failover? Tell me more");
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_empty_turn() {
        let provider = ScriptedProvider::new()
            .reply("Opening.")
            .fail("connection reset")
            .reply("Understood. What happened next?");
        let (conn, mut rx, _dir) = connected_with(provider.clone()).await;

        conn.handle_text(r#"{"type":"message","content":"First answer."}"#)
            .await;
        match rx.recv().await.unwrap() {
            ServerFrame::Error { .. } => {}
            other => panic!("unexpected frame: {other:?}"),
        }

        conn.handle_text(r#"{"type":"message","content":"Second answer."}"#)
            .await;
        loop {
            if let ServerFrame::ResponseComplete { .. } = rx.recv().await.unwrap() {
                break;
            }
        }

        let requests = provider.requests.lock().unwrap();
        let turns: Vec<(MessageRole, String)> = requests
            .last()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| (m.role, m.content.clone()))
            .collect();
        assert_eq!(
            turns,
            vec![
                (MessageRole::Assistant, "Opening.".to_string()),
                (MessageRole::User, "First answer.".to_string()),
                (MessageRole::User, "Second answer.".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_reply_persisted_after_disconnect() {
        let (conn, rx, _dir) = connected(&["Opening.", "Noted. What was the hardest bug?"]).await;
        drop(rx);

        conn.handle_text(r#"{"type":"message","content":"I fixed a deadlock."}"#)
            .await;

        // The reply task keeps running with nobody listening.
        let mut persisted = None;
        for _ in 0..50 {
            let transcript = conn
                .state
                .interview_service
                .messages(&conn.caller, &conn.session_id)
                .await
                .unwrap();
            let last = transcript.last().unwrap();
            if !last.content.is_empty() {
                persisted = Some(last.content.clone());
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(persisted.as_deref(), Some("Noted. What was the hardest bug?"));
    }

    #[tokio::test]
    async fn test_time_update_persists_on_boundary() {
        let (conn, _rx, _dir) = connected(&["Opening."]).await;

        let frames = conn.handle_frame(ClientFrame::TimeUpdate { remaining_time: 600_000 }).await;
        assert!(matches!(
            frames.as_slice(),
            [ServerFrame::TimeUpdateSuccess { remaining_time: 600_000, .. }]
        ));

        let session = conn
            .state
            .interview_service
            .get(&conn.caller, &conn.session_id)
            .await
            .unwrap();
        assert_eq!(session.remaining_time_ms, Some(600_000));

        conn.handle_frame(ClientFrame::TimeUpdate { remaining_time: 595_000 }).await;
        let session = conn
            .state
            .interview_service
            .get(&conn.caller, &conn.session_id)
            .await
            .unwrap();
        assert_eq!(session.remaining_time_ms, Some(600_000));
    }

    #[tokio::test]
    async fn test_time_warning_broadcast_once() {
        let (conn, _rx, _dir) = connected(&["Opening.", "Last question: what would you improve?"]).await;
        let mut room = conn.state.rooms.join(conn.session_id);

        let frames = conn.handle_frame(ClientFrame::TimeUpdate { remaining_time: 180_000 }).await;
        assert!(matches!(frames.last(), Some(ServerFrame::TimeUpdateSuccess { .. })));

        match room.recv().await.unwrap() {
            ServerFrame::TimeRunningOut { message, .. } => {
                assert_eq!(message, "Last question: what would you improve?");
            }
            other => panic!("unexpected frame: {other:?}"),
        }

        conn.handle_frame(ClientFrame::TimeUpdate { remaining_time: 179_500 }).await;
        assert!(room.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_admit_checks() {
        let (conn, _rx, _dir) = connected(&["Opening."]).await;
        let state = &conn.state;
        let id = conn.session_id.to_string();
        let owner_token = sign_test_token(JWT_SECRET, &conn.caller.user_id.to_string(), None, far_future());

        let (caller, session_id) = admit(state, &id, Ok(owner_token.clone())).await.unwrap();
        assert_eq!(caller, conn.caller);
        assert_eq!(session_id, conn.session_id);

        let missing = admit(state, &id, Err(AppError::Unauthorized("missing".into()))).await;
        assert!(matches!(missing, Err(AppError::Unauthorized(_))));

        let stranger = sign_test_token(JWT_SECRET, &Uuid::now_v7().to_string(), None, far_future());
        let forbidden = admit(state, &id, Ok(stranger)).await;
        assert!(matches!(forbidden, Err(AppError::Interview(InterviewError::Forbidden))));

        let unknown = admit(state, &Uuid::now_v7().to_string(), Ok(owner_token.clone())).await;
        assert!(matches!(unknown, Err(AppError::Interview(InterviewError::NotFound(_)))));

        state
            .interview_service
            .end(&conn.caller, &conn.session_id)
            .await
            .unwrap();
        let ended = admit(state, &id, Ok(owner_token)).await;
        assert!(matches!(ended, Err(AppError::Interview(InterviewError::InvalidState(_)))));
    }
}

//! Scripted LLM provider for tests in this and downstream crates.
//!
//! Compiled for this crate's own tests and, through the `testing` feature,
//! for the dev-dependencies of intervu-api.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::Stream;
use intervu_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, Usage,
};

use crate::llm::provider::LlmProvider;

/// Reply used once the queue runs dry.
pub const DEFAULT_REPLY: &str = "Could you tell me more about that?";

/// Returns queued replies in order (or [`DEFAULT_REPLY`]) and records requests.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        replies
            .iter()
            .fold(Self::new(), |provider, reply| provider.reply(reply))
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Delay every completion, so tests can interleave other calls with it.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn next(&self, request: &CompletionRequest) -> Result<String, String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        let result = self.next(request);
        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            let content = result.map_err(|message| LlmError::Provider { message })?;
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content,
                model: "scripted-model".to_string(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let result = self.next(&request);
        let latency = self.latency;
        Box::pin(async_stream::stream! {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            yield Ok(StreamEvent::Connected);
            match result {
                Ok(text) => {
                    // Deliver in small uneven pieces like a real provider.
                    let chars: Vec<char> = text.chars().collect();
                    for piece in chars.chunks(7) {
                        yield Ok(StreamEvent::TextDelta { text: piece.iter().collect() });
                    }
                    yield Ok(StreamEvent::MessageDelta { stop_reason: StopReason::EndTurn });
                    yield Ok(StreamEvent::Done);
                }
                Err(message) => yield Err(LlmError::Stream(message)),
            }
        })
    }
}

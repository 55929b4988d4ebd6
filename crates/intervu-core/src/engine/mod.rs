//! Interview engine: prompt assembly and model calls for every interviewer turn.
//!
//! `InterviewEngine` is stateless between calls. Each operation rebuilds the
//! request from the session settings and the transcript, sends it through a
//! `BoxLlmProvider`, and returns text. Every call runs in a `gen_ai.*` span.

pub mod feedback;
pub mod phase;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tracing::{Instrument, error, info_span};

use intervu_types::error::InterviewError;
use intervu_types::feedback::FeedbackResult;
use intervu_types::interview::InterviewSettings;
use intervu_types::llm::{CompletionRequest, LlmError, Message, StreamEvent};
use intervu_types::message::{InterviewMessage, MessageAuthor};

use crate::llm::box_provider::BoxLlmProvider;
use crate::prompt::language::resolve_language;
use crate::prompt::registry::PromptProviderRegistry;

use self::feedback::parse_feedback;
use self::phase::{InterviewPhase, interviewer_turns};

/// Sampling temperature for interviewer turns.
pub const CONVERSATION_TEMPERATURE: f64 = 0.7;
/// Sampling temperature for feedback extraction.
pub const FEEDBACK_TEMPERATURE: f64 = 0.3;

const OPENING_INSTRUCTION: &str = "Please start the interview with an introduction.";
const GENERIC_CLOSING_INSTRUCTION: &str =
    "Please end the interview with an appropriate closing statement.";
const GENERIC_FINAL_QUESTION: &str =
    "Please ask your final question to close the interview gracefully.";
const SPECIALIZED_FINAL_QUESTION: &str = "Please provide a professional closing that acknowledges \
    the technical discussion and asks if the candidate has any final questions about the role or company.";
const ROLE_MAPPING_REMINDER: &str = "REMINDER: The conversation pattern MUST be:
- 'interviewer' messages (YOU) -> mapped to 'assistant' in this API call
- 'candidate' messages (HUMAN) -> mapped to 'user' in this API call
NEVER deviate from this pattern.";
const STAY_IN_ROLE: &str = "IMPORTANT: Stay in the interviewer role. Do not simulate or pretend \
    to be the candidate. Respond directly to what the candidate just said.";

/// A lazily consumed stream of interviewer text deltas.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send + 'static>>;

/// Model settings applied to every request.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Empty means the provider's configured model.
    pub model: String,
    pub max_tokens: Option<u32>,
}

/// Generates interviewer turns and feedback for a session.
pub struct InterviewEngine {
    provider: BoxLlmProvider,
    prompts: PromptProviderRegistry,
    options: EngineOptions,
}

impl InterviewEngine {
    pub fn new(
        provider: BoxLlmProvider,
        prompts: PromptProviderRegistry,
        options: EngineOptions,
    ) -> Self {
        Self {
            provider,
            prompts,
            options,
        }
    }

    pub fn prompts(&self) -> &PromptProviderRegistry {
        &self.prompts
    }

    /// Opening statement for a basic interview.
    pub async fn generate_opening(
        &self,
        settings: &InterviewSettings,
    ) -> Result<String, InterviewError> {
        let messages = vec![
            Message::system(self.system_prompt(settings)?),
            Message::user(OPENING_INSTRUCTION),
        ];
        self.complete("gen_ai.opening", messages, CONVERSATION_TEMPERATURE)
            .await
    }

    /// Opening statement for a specialized interview.
    pub async fn generate_specialized_opening(
        &self,
        settings: &InterviewSettings,
    ) -> Result<String, InterviewError> {
        let messages = vec![
            Message::system(self.system_prompt(settings)?),
            Message::user(specialized_opening_instruction(settings)),
        ];
        self.complete("gen_ai.opening", messages, CONVERSATION_TEMPERATURE)
            .await
    }

    /// Next interviewer turn given the transcript so far.
    pub async fn generate_response(
        &self,
        settings: &InterviewSettings,
        history: &[InterviewMessage],
    ) -> Result<String, InterviewError> {
        let messages = self.conversation_messages(settings, history)?;
        self.complete("gen_ai.response", messages, CONVERSATION_TEMPERATURE)
            .await
    }

    /// Same request as [`generate_response`](Self::generate_response),
    /// delivered as text deltas.
    pub fn generate_response_stream(
        &self,
        settings: &InterviewSettings,
        history: &[InterviewMessage],
    ) -> Result<TextStream, InterviewError> {
        let messages = self.conversation_messages(settings, history)?;
        let request = self.request(messages, CONVERSATION_TEMPERATURE, true);

        let span = info_span!(
            "gen_ai.response_stream",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = true,
        );

        let events = self.provider.stream(request);
        let text = events.filter_map(|event| async move {
            match event {
                Ok(StreamEvent::TextDelta { text }) => Some(Ok(text)),
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            }
        });

        Ok(Box::pin(StreamInSpan {
            inner: Box::pin(text),
            span,
        }))
    }

    /// Closing statement produced when the interview ends.
    pub async fn generate_closing(
        &self,
        settings: &InterviewSettings,
    ) -> Result<String, InterviewError> {
        let instruction = match settings.specialization() {
            Some(specialization) => format!(
                "Please end this specialized {specialization} interview with:
1. Thanks for the rich technical discussion
2. Brief positive comment about the knowledge demonstrated
3. Explanation of next steps in the process
4. Invitation for final questions from the candidate
5. Professional and cordial closing

Maintain a professional and positive tone, appropriate for a specialized technical interview."
            ),
            None => GENERIC_CLOSING_INSTRUCTION.to_string(),
        };
        let messages = vec![
            Message::system(self.system_prompt(settings)?),
            Message::user(instruction),
        ];
        self.complete("gen_ai.closing", messages, CONVERSATION_TEMPERATURE)
            .await
    }

    /// Final-question turn once the clock is nearly out.
    pub async fn generate_time_running_out_response(
        &self,
        settings: &InterviewSettings,
        history: &[InterviewMessage],
        instruction: &str,
    ) -> Result<String, InterviewError> {
        let mut messages = vec![Message::system(self.system_prompt(settings)?)];
        messages.extend(spoken(history).map(to_llm_message));
        messages.push(Message::system(instruction));
        messages.push(Message::user(if settings.is_specialized() {
            SPECIALIZED_FINAL_QUESTION
        } else {
            GENERIC_FINAL_QUESTION
        }));
        self.complete("gen_ai.time_running_out", messages, CONVERSATION_TEMPERATURE)
            .await
    }

    /// Structured feedback for a finished transcript.
    ///
    /// Output that is not valid feedback JSON is an upstream error; the raw
    /// text is logged and never coerced.
    pub async fn generate_feedback(
        &self,
        settings: &InterviewSettings,
        history: &[InterviewMessage],
    ) -> Result<FeedbackResult, InterviewError> {
        let provider = self.prompts.get_provider(settings)?;
        let feedback_prompt = provider.feedback_prompt(settings);

        let mut transcript = String::new();
        for message in spoken(history) {
            transcript.push_str(message.role.label());
            transcript.push_str(": ");
            transcript.push_str(&message.content);
            transcript.push_str("\n\n");
        }

        let context = match settings.specialization() {
            Some(specialization) => format!(
                "\n\nINTERVIEW CONTEXT:\n\
                 - Type: Specialized {specialization} interview\n\
                 - Level: {}\n\
                 - Duration: {} minutes\n\
                 - This was a structured technical interview covering multiple competency areas.",
                settings
                    .career_level
                    .map(|l| l.as_str().to_uppercase())
                    .unwrap_or_else(|| "UNSPECIFIED".to_string()),
                settings.interview_duration_minutes
            ),
            None => String::new(),
        };

        let messages = vec![
            Message::system(feedback_prompt),
            Message::user(format!(
                "Here is the interview conversation:{context}\n\n{transcript}"
            )),
        ];
        let raw = self
            .complete("gen_ai.feedback", messages, FEEDBACK_TEMPERATURE)
            .await?;

        parse_feedback(&raw).map_err(|err| {
            error!(error = %err, raw = %raw, "Failed to parse feedback response");
            InterviewError::Upstream(format!("failed to parse feedback response: {err}"))
        })
    }

    fn system_prompt(&self, settings: &InterviewSettings) -> Result<String, InterviewError> {
        let provider = self.prompts.get_provider(settings)?;
        Ok(provider.system_prompt(settings))
    }

    /// Shared assembly for streaming and non-streaming turns.
    fn conversation_messages(
        &self,
        settings: &InterviewSettings,
        history: &[InterviewMessage],
    ) -> Result<Vec<Message>, InterviewError> {
        let mut messages = vec![Message::system(self.system_prompt(settings)?)];

        if let Some(specialization) = settings.specialization() {
            let turns = interviewer_turns(history);
            let phase = InterviewPhase::from_interviewer_turns(turns);
            messages.push(Message::system(format!(
                "SPECIALIZED INTERVIEW CONTEXT:\n\
                 {}\n\n\
                 Interview Progress: {turns} interviewer responses so far\n\
                 Specialization: {specialization}\n\
                 Career Level: {}\n\n\
                 Remember to use clear transitions when moving between topics and maintain the \
                 structured flow of the specialized interview.",
                phase.guidance(),
                settings
                    .career_level
                    .map(|l| l.as_str())
                    .unwrap_or("unspecified"),
            )));
        }

        messages.push(Message::system(ROLE_MAPPING_REMINDER));
        messages.push(Message::system(STAY_IN_ROLE));

        let language = resolve_language(settings);
        messages.push(Message::system(format!(
            "This interview is in {}. All responses must be in {}.",
            language.display_name(),
            language.display_name()
        )));

        messages.extend(spoken(history).map(to_llm_message));
        Ok(messages)
    }

    fn request(&self, messages: Vec<Message>, temperature: f64, stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.options.model.clone(),
            messages,
            max_tokens: self.options.max_tokens,
            temperature: Some(temperature),
            stream,
        }
    }

    async fn complete(
        &self,
        span_name: &'static str,
        messages: Vec<Message>,
        temperature: f64,
    ) -> Result<String, InterviewError> {
        let request = self.request(messages, temperature, false);
        let span = info_span!(
            "gen_ai.complete",
            otel.name = span_name,
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = false,
        );
        let response = self.provider.complete(&request).instrument(span).await?;
        Ok(response.content)
    }
}

/// Transcript lines with text; placeholders left empty by a failed stream are skipped.
fn spoken(history: &[InterviewMessage]) -> impl Iterator<Item = &InterviewMessage> {
    history.iter().filter(|m| !m.is_blank())
}

/// Interviewer turns are the model's own output; candidate turns are user input.
pub fn to_llm_message(message: &InterviewMessage) -> Message {
    match message.role {
        MessageAuthor::Interviewer => Message::assistant(message.content.clone()),
        MessageAuthor::Candidate => Message::user(message.content.clone()),
    }
}

fn specialized_opening_instruction(settings: &InterviewSettings) -> String {
    let language = resolve_language(settings);
    let specialization = settings
        .specialization()
        .map(|s| s.role_name().to_lowercase())
        .unwrap_or_else(|| "technical".to_string());
    let level = settings
        .career_level
        .map(|l| l.as_str().to_uppercase())
        .unwrap_or_else(|| "UNSPECIFIED".to_string());
    format!(
        "LANGUAGE INSTRUCTION: The interview is conducted in {lang}. Respond in {lang}.

Please start this specialized {specialization} interview for {level} level with:
1. A warm and professional introduction
2. Brief explanation about the structure of this specialized technical interview
3. Invitation for the candidate to briefly introduce themselves and discuss their most relevant experience
4. Maintain a {personality} tone as per your personality

Don't mention specific interview phases, just indicate it will be a structured technical conversation.",
        lang = language.display_name(),
        personality = settings.interviewer_personality
    )
}

/// Keeps a tracing span alive for the lifetime of a stream.
struct StreamInSpan {
    inner: Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send + 'static>>,
    span: tracing::Span,
}

impl Stream for StreamInSpan {
    type Item = Result<String, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let _enter = this.span.enter();
        this.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::ScriptedProvider;
    use super::*;
    use intervu_types::interview::{CareerLevel, InterviewType, Language, SpecializedInterviewType};
    use intervu_types::llm::MessageRole;
    use uuid::Uuid;

    fn engine(provider: ScriptedProvider) -> InterviewEngine {
        InterviewEngine::new(
            BoxLlmProvider::new(provider),
            PromptProviderRegistry::with_defaults(),
            EngineOptions::default(),
        )
    }

    fn history(session: Uuid, turns: &[(MessageAuthor, &str)]) -> Vec<InterviewMessage> {
        turns
            .iter()
            .map(|(role, content)| InterviewMessage::new(session, *role, *content))
            .collect()
    }

    #[tokio::test]
    async fn test_opening_uses_introduction_instruction() {
        let provider = ScriptedProvider::new().reply("Welcome!");
        let engine = engine(provider.clone());
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);

        let text = engine.generate_opening(&settings).await.unwrap();
        assert_eq!(text, "Welcome!");

        let requests = provider.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.temperature, Some(CONVERSATION_TEMPERATURE));
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].content, OPENING_INSTRUCTION);
    }

    #[tokio::test]
    async fn test_response_maps_roles_totally() {
        let provider = ScriptedProvider::new().reply("Next question.");
        let engine = engine(provider.clone());
        let mut settings = InterviewSettings::basic("Engineer", InterviewType::Technical);
        settings.language = Some(Language::EnUs);
        let session = Uuid::now_v7();
        let hist = history(
            session,
            &[
                (MessageAuthor::Interviewer, "Q1"),
                (MessageAuthor::Candidate, "A1"),
                (MessageAuthor::Interviewer, "Q2"),
                (MessageAuthor::Candidate, "A2"),
            ],
        );

        engine.generate_response(&settings, &hist).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let messages = &requests[0].messages;
        let tail = &messages[messages.len() - 4..];
        let roles: Vec<MessageRole> = tail.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert!(messages.iter().any(|m| m.content.starts_with("REMINDER")));
        assert!(messages.iter().any(|m| m.content == "This interview is in English. All responses must be in English."));
        // Basic interviews carry no phase context.
        assert!(!messages.iter().any(|m| m.content.contains("SPECIALIZED INTERVIEW CONTEXT")));
    }

    #[tokio::test]
    async fn test_specialized_response_includes_phase_context() {
        let provider = ScriptedProvider::new();
        let engine = engine(provider.clone());
        let settings = InterviewSettings::specialized(
            "Engineer",
            SpecializedInterviewType::BackendDeveloper,
            Some(CareerLevel::Sr),
        );
        let session = Uuid::now_v7();
        let mut turns = Vec::new();
        for _ in 0..6 {
            turns.push((MessageAuthor::Interviewer, "Q"));
            turns.push((MessageAuthor::Candidate, "A"));
        }
        let hist = history(session, &turns);

        engine.generate_response(&settings, &hist).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let context = &requests[0].messages[1];
        assert_eq!(context.role, MessageRole::System);
        assert!(context.content.contains("CURRENT PHASE: Core Technical"));
        assert!(context.content.contains("Interview Progress: 6 interviewer responses so far"));
    }

    #[tokio::test]
    async fn test_stream_yields_only_text() {
        let provider = ScriptedProvider::new().reply("Tell me about a project you led.");
        let engine = engine(provider);
        let settings = InterviewSettings::basic("Engineer", InterviewType::Leadership);

        let mut stream = engine.generate_response_stream(&settings, &[]).unwrap();
        let mut text = String::new();
        while let Some(delta) = stream.next().await {
            text.push_str(&delta.unwrap());
        }
        assert_eq!(text, "Tell me about a project you led.");
    }

    #[tokio::test]
    async fn test_closing_instruction_depends_on_product() {
        let provider = ScriptedProvider::new();
        let engine = engine(provider.clone());

        let basic = InterviewSettings::basic("Engineer", InterviewType::Hr);
        engine.generate_closing(&basic).await.unwrap();
        let specialized =
            InterviewSettings::specialized("Engineer", SpecializedInterviewType::QaEngineer, None);
        engine.generate_closing(&specialized).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages[1].content, GENERIC_CLOSING_INSTRUCTION);
        assert!(requests[1].messages[1].content.contains("specialized qa_engineer interview"));
    }

    #[tokio::test]
    async fn test_time_running_out_message_order() {
        let provider = ScriptedProvider::new();
        let engine = engine(provider.clone());
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);
        let hist = history(Uuid::now_v7(), &[(MessageAuthor::Interviewer, "Q1")]);

        engine
            .generate_time_running_out_response(&settings, &hist, "wrap up")
            .await
            .unwrap();

        let requests = provider.requests.lock().unwrap();
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].role, MessageRole::System);
        assert_eq!(messages[2].content, "wrap up");
        assert_eq!(messages[3].role, MessageRole::User);
        assert_eq!(messages[3].content, GENERIC_FINAL_QUESTION);
    }

    #[tokio::test]
    async fn test_feedback_parses_fenced_json() {
        let provider = ScriptedProvider::new().reply(
            "```json\n{\"overall_score\": 3, \"overall_comment\": \"Fine\", \"feedback_items\": [], \
             \"strengths\": [], \"areas_to_improve\": []}\n```",
        );
        let engine = engine(provider.clone());
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);
        let hist = history(
            Uuid::now_v7(),
            &[(MessageAuthor::Interviewer, "Q1"), (MessageAuthor::Candidate, "A1")],
        );

        let feedback = engine.generate_feedback(&settings, &hist).await.unwrap();
        assert_eq!(feedback.overall_score, 3);

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, Some(FEEDBACK_TEMPERATURE));
        assert!(requests[0].messages[1].content.contains("Interviewer: Q1\n\nCandidate: A1\n\n"));
    }

    #[tokio::test]
    async fn test_blank_placeholder_is_skipped() {
        let provider = ScriptedProvider::new().reply("Go on.").reply(
            r#"{"overall_score": 2, "overall_comment": "Short", "feedback_items": [], "strengths": [], "areas_to_improve": []}"#,
        );
        let engine = engine(provider.clone());
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);
        let hist = history(
            Uuid::now_v7(),
            &[
                (MessageAuthor::Interviewer, "Q1"),
                (MessageAuthor::Candidate, "A1"),
                (MessageAuthor::Interviewer, ""),
                (MessageAuthor::Candidate, "A2"),
            ],
        );

        engine.generate_response(&settings, &hist).await.unwrap();
        engine.generate_feedback(&settings, &hist).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let turns: Vec<&str> = requests[0]
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(turns, vec!["Q1", "A1", "A2"]);
        let transcript = &requests[1].messages[1].content;
        assert!(transcript.contains("Candidate: A1\n\nCandidate: A2\n\n"));
        assert!(!transcript.contains("Interviewer: \n"));
    }

    #[tokio::test]
    async fn test_malformed_feedback_is_upstream_error() {
        let provider = ScriptedProvider::new().reply("not json at all");
        let engine = engine(provider);
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);

        let err = engine.generate_feedback(&settings, &[]).await.unwrap_err();
        assert!(matches!(err, InterviewError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_upstream_error() {
        let provider = ScriptedProvider::new().fail("boom");
        let engine = engine(provider);
        let settings = InterviewSettings::basic("Engineer", InterviewType::General);

        let err = engine.generate_opening(&settings).await.unwrap_err();
        assert!(matches!(err, InterviewError::Upstream(ref m) if m.contains("boom")));
    }
}

//! Interview prompt composition.
//!
//! A [`PromptProvider`] turns an [`InterviewSettings`] snapshot into the
//! system prompt that keeps the model in the interviewer role and the
//! feedback prompt used after the interview ends. The
//! [`registry::PromptProviderRegistry`] picks the provider for a session.

pub mod base;
pub mod catalog;
pub mod language;
pub mod registry;
pub mod specialist;

use intervu_types::interview::InterviewSettings;

/// Literal marker the model appends to its final message only.
pub const END_INTERVIEW_MARKER: &str = "{{END_INTERVIEW}}";

/// Prompt strategy for one family of interview configurations.
///
/// Providers are pure: the same settings always yield the same text.
pub trait PromptProvider: Send + Sync {
    /// Short identifier used in logs ("base", "backend", ...).
    fn name(&self) -> &str;

    /// Whether this provider is responsible for the given settings.
    fn can_handle(&self, settings: &InterviewSettings) -> bool;

    /// System prompt for every interviewer turn.
    fn system_prompt(&self, settings: &InterviewSettings) -> String;

    /// Instructions for extracting structured JSON feedback from a transcript.
    fn feedback_prompt(&self, settings: &InterviewSettings) -> String;
}

/// Shared shape of every feedback prompt.
///
/// `categories` are the allowed `category` values and `char_limit` bounds
/// every free-text field.
pub(crate) struct FeedbackPromptParts<'a> {
    pub coach_intro: String,
    pub phases: Option<&'a [&'a str]>,
    pub categories: &'a [&'a str],
    pub char_limit: u32,
    pub language_instruction: String,
}

pub(crate) fn render_feedback_prompt(parts: FeedbackPromptParts<'_>) -> String {
    let mut sections = Vec::with_capacity(6);

    sections.push(parts.coach_intro);

    if let Some(phases) = parts.phases {
        let lines: Vec<String> = phases
            .iter()
            .enumerate()
            .map(|(i, phase)| format!("{}. {phase}", i + 1))
            .collect();
        sections.push(format!(
            "This was a structured technical interview that followed these phases:\n{}",
            lines.join("\n")
        ));
    }

    let categories: Vec<String> = parts.categories.iter().map(|c| format!("\"{c}\"")).collect();
    let limit = parts.char_limit;
    sections.push(format!(
        "Analyze the interview conversation and provide constructive feedback.\n\
         Format your response as a JSON object with the following structure:\n\
         {{\n\
         \x20   \"overall_score\": <integer between 1 and 5>,\n\
         \x20   \"overall_comment\": <general assessment of interview performance - maximum {limit} characters>,\n\
         \x20   \"feedback_items\": [\n\
         \x20       {{\n\
         \x20           \"category\": <one of: {}>,\n\
         \x20           \"score\": <integer between 1 and 5>,\n\
         \x20           \"comment\": <specific observation about this aspect - maximum {limit} characters>,\n\
         \x20           \"improvement_suggestion\": <actionable advice for improvement - maximum {limit} characters>\n\
         \x20       }},\n\
         \x20       ...\n\
         \x20   ],\n\
         \x20   \"strengths\": [<list of candidate's strengths, each item maximum {limit} characters>],\n\
         \x20   \"areas_to_improve\": [<list of areas the candidate could improve, each item maximum {limit} characters>]\n\
         }}",
        categories.join(", ")
    ));

    sections.push(
        "Ensure your feedback is constructive, specific and actionable. Be concise and direct, \
         keeping within the character limits indicated for each field. Don't be generic or \
         redundant. This should be real and useful feedback for the candidate."
            .to_string(),
    );

    sections.push(
        "IMPORTANT: You should not invent feedback, you should respond based on what the \
         candidate said. If you don't have enough context to provide feedback, respond that you \
         don't have enough context to provide feedback and that the candidate should perform \
         another interview."
            .to_string(),
    );

    sections.push(parts.language_instruction);

    sections.join("\n\n")
}

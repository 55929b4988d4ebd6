//! Conversation language resolution.
//!
//! The explicit `language` setting always wins. Sessions created without one
//! fall back to a keyword heuristic over the custom instructions and the job
//! title.

use intervu_types::interview::{InterviewSettings, Language};

const PORTUGUESE_INSTRUCTION_HINTS: [&str; 3] = ["português", "brasil", "brasileiro"];

const PORTUGUESE_TITLE_KEYWORDS: [&str; 8] = [
    "desenvolvedor",
    "analista",
    "engenheiro",
    "técnico",
    "programador",
    "gerente",
    "coordenador",
    "líder",
];

/// The language the interview is conducted in.
pub fn resolve_language(settings: &InterviewSettings) -> Language {
    settings.language.unwrap_or_else(|| infer_language(settings))
}

/// Keyword heuristic used only when no language was configured.
pub fn infer_language(settings: &InterviewSettings) -> Language {
    if let Some(instructions) = &settings.custom_instructions {
        let lowered = instructions.to_lowercase();
        if PORTUGUESE_INSTRUCTION_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
        {
            return Language::PtBr;
        }
    }

    let title = settings.job_title.to_lowercase();
    if PORTUGUESE_TITLE_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword))
    {
        return Language::PtBr;
    }

    Language::EnUs
}

/// Section that locks the whole conversation to one language.
pub fn language_lock(language: Language) -> String {
    let name = language.display_name();
    format!(
        "LANGUAGE INSTRUCTION: Conduct this entire interview in {name}. \
         All questions, responses, and instructions should be in {name}."
    )
}

/// Language line appended to feedback prompts.
pub fn feedback_language_instruction(language: Language) -> String {
    let name = language.display_name();
    format!(
        "LANGUAGE INSTRUCTION: The candidate's interview was conducted in {tag}. \
         Your feedback should also be in {name}. Translate all feedback items, categories, \
         strengths and areas to improve to {name}.",
        tag = language.tag()
    )
}

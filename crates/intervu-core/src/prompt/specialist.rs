//! Prompt providers for specialized technical interviews.
//!
//! Every specialist reuses the basic sections but swaps the interview
//! category block for a structured curriculum tailored to its [`Track`].

use intervu_types::interview::{
    InterviewSettings, InterviewType, SpecializedInterviewType,
};

use super::base::{difficulty, focus_areas, framing, interview_rules, personality, role_anchor};
use super::catalog;
use super::language::{feedback_language_instruction, language_lock, resolve_language};
use super::{FeedbackPromptParts, PromptProvider, render_feedback_prompt};

/// The closed set of specialist prompt strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    Backend,
    Frontend,
    Fullstack,
    /// Generic technical track for every other role.
    Technical,
}

impl Track {
    /// The track responsible for a specialization.
    pub fn for_specialization(specialization: SpecializedInterviewType) -> Self {
        match specialization {
            SpecializedInterviewType::BackendDeveloper => Track::Backend,
            SpecializedInterviewType::FrontendDeveloper => Track::Frontend,
            SpecializedInterviewType::FullstackDeveloper => Track::Fullstack,
            SpecializedInterviewType::MobileDeveloper
            | SpecializedInterviewType::DevopsEngineer
            | SpecializedInterviewType::DataScientist
            | SpecializedInterviewType::UxUiDesigner
            | SpecializedInterviewType::ProductManager
            | SpecializedInterviewType::QaEngineer
            | SpecializedInterviewType::CloudArchitect => Track::Technical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Backend => "backend",
            Track::Frontend => "frontend",
            Track::Fullstack => "fullstack",
            Track::Technical => "technical",
        }
    }

    fn coach_area(&self) -> &'static str {
        match self {
            Track::Backend => "backend development",
            Track::Frontend => "frontend development",
            Track::Fullstack => "fullstack development",
            Track::Technical => "technical",
        }
    }
}

/// Prompt provider for one specialist track.
#[derive(Debug, Clone, Copy)]
pub struct SpecialistPromptProvider {
    track: Track,
}

impl SpecialistPromptProvider {
    pub fn new(track: Track) -> Self {
        Self { track }
    }

    /// Replaces the basic category block.
    fn specialist_block(
        &self,
        settings: &InterviewSettings,
        specialization: SpecializedInterviewType,
    ) -> String {
        let language = resolve_language(settings);
        let mut sections = vec![
            language_lock(language),
            format!(
                "This is a specialized {} interview for {} level.",
                specialization.role_name(),
                level_label(settings)
            ),
            catalog::level_guidance(self.track, settings.career_level).to_string(),
            catalog::curriculum(self.track),
            catalog::competencies(self.track, specialization),
            catalog::discussion_guidelines(self.track).to_string(),
            catalog::transition_phrases(self.track).to_string(),
        ];
        if let Some(requirements) = job_requirements(settings) {
            sections.push(requirements);
        }
        sections.join("\n\n")
    }
}

impl PromptProvider for SpecialistPromptProvider {
    fn name(&self) -> &str {
        self.track.as_str()
    }

    fn can_handle(&self, settings: &InterviewSettings) -> bool {
        settings
            .specialization()
            .is_some_and(|s| Track::for_specialization(s) == self.track)
    }

    fn system_prompt(&self, settings: &InterviewSettings) -> String {
        let Some(specialization) = settings.specialization() else {
            // Not routed here by the registry; degrade to the technical framing.
            return framing(settings, InterviewType::Technical);
        };

        let mut sections = vec![
            role_anchor().to_string(),
            framing(settings, InterviewType::Technical),
            personality(settings.interviewer_personality),
            self.specialist_block(settings, specialization),
            difficulty(settings),
        ];
        if let Some(focus) = focus_areas(settings) {
            sections.push(focus);
        }
        sections.push(interview_rules(resolve_language(settings)));
        sections.join("\n\n")
    }

    fn feedback_prompt(&self, settings: &InterviewSettings) -> String {
        let role = settings
            .specialization()
            .map(|s| s.role_name())
            .unwrap_or("Technical");
        let phases = catalog::phases(self.track);
        let phase_names: Vec<&str> = phases.iter().map(|(name, _)| *name).collect();
        let (categories, char_limit) = catalog::feedback_categories(self.track);

        render_feedback_prompt(FeedbackPromptParts {
            coach_intro: format!(
                "You are a coach specialized in {} job interviews. You need to provide detailed \
                 feedback for a candidate who just completed a specialized {role} interview for \
                 the position of {} at {} level.",
                self.track.coach_area(),
                settings.job_title,
                level_label(settings)
            ),
            phases: Some(&phase_names),
            categories,
            char_limit,
            language_instruction: feedback_language_instruction(resolve_language(settings)),
        })
    }
}

fn level_label(settings: &InterviewSettings) -> String {
    settings
        .career_level
        .map(|l| l.as_str().to_uppercase())
        .unwrap_or_else(|| "UNSPECIFIED".to_string())
}

/// Custom instructions and skill lists, when any were supplied.
fn job_requirements(settings: &InterviewSettings) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(custom) = settings
        .custom_instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        lines.push(custom.to_string());
    }
    if !settings.required_skills.is_empty() {
        lines.push(format!(
            "Required skills: {}",
            settings.required_skills.join(", ")
        ));
    }
    if !settings.preferred_skills.is_empty() {
        lines.push(format!(
            "Preferred skills: {}",
            settings.preferred_skills.join(", ")
        ));
    }
    if lines.is_empty() {
        return None;
    }
    Some(format!("SPECIFIC JOB REQUIREMENTS:\n{}", lines.join("\n")))
}

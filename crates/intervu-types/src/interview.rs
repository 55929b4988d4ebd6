//! Interview configuration and session types.
//!
//! `InterviewSettings` is the immutable snapshot captured when a session is
//! created. `InterviewSession` carries the lifecycle state driven by the
//! interview service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Broad interview category used by non-specialized interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Hr,
    Behavioral,
    Leadership,
    General,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Hr => "hr",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Leadership => "leadership",
            InterviewType::General => "general",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone profile of the AI interviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewerPersonality {
    Friendly,
    Strict,
    #[default]
    Neutral,
    Challenging,
}

impl InterviewerPersonality {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewerPersonality::Friendly => "friendly",
            InterviewerPersonality::Strict => "strict",
            InterviewerPersonality::Neutral => "neutral",
            InterviewerPersonality::Challenging => "challenging",
        }
    }
}

impl fmt::Display for InterviewerPersonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation language. Serialized as a BCP-47 style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-us")]
    EnUs,
    #[serde(rename = "pt-br")]
    PtBr,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::EnUs => "en-us",
            Language::PtBr => "pt-br",
        }
    }

    /// English name of the language, used inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::EnUs => "English",
            Language::PtBr => "Portuguese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Text-to-speech voice requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

/// Product tier purchased for the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewProductType {
    #[default]
    BasicInterview,
    Specialized,
}

/// Technical role track of a specialized interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecializedInterviewType {
    BackendDeveloper,
    FrontendDeveloper,
    FullstackDeveloper,
    MobileDeveloper,
    DevopsEngineer,
    DataScientist,
    UxUiDesigner,
    ProductManager,
    QaEngineer,
    CloudArchitect,
}

impl SpecializedInterviewType {
    /// Every known specialization, in declaration order.
    pub const ALL: [SpecializedInterviewType; 10] = [
        SpecializedInterviewType::BackendDeveloper,
        SpecializedInterviewType::FrontendDeveloper,
        SpecializedInterviewType::FullstackDeveloper,
        SpecializedInterviewType::MobileDeveloper,
        SpecializedInterviewType::DevopsEngineer,
        SpecializedInterviewType::DataScientist,
        SpecializedInterviewType::UxUiDesigner,
        SpecializedInterviewType::ProductManager,
        SpecializedInterviewType::QaEngineer,
        SpecializedInterviewType::CloudArchitect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecializedInterviewType::BackendDeveloper => "backend_developer",
            SpecializedInterviewType::FrontendDeveloper => "frontend_developer",
            SpecializedInterviewType::FullstackDeveloper => "fullstack_developer",
            SpecializedInterviewType::MobileDeveloper => "mobile_developer",
            SpecializedInterviewType::DevopsEngineer => "devops_engineer",
            SpecializedInterviewType::DataScientist => "data_scientist",
            SpecializedInterviewType::UxUiDesigner => "ux_ui_designer",
            SpecializedInterviewType::ProductManager => "product_manager",
            SpecializedInterviewType::QaEngineer => "qa_engineer",
            SpecializedInterviewType::CloudArchitect => "cloud_architect",
        }
    }

    /// Human-readable role name ("Backend Developer", "UX/UI Designer").
    pub fn role_name(&self) -> &'static str {
        match self {
            SpecializedInterviewType::BackendDeveloper => "Backend Developer",
            SpecializedInterviewType::FrontendDeveloper => "Frontend Developer",
            SpecializedInterviewType::FullstackDeveloper => "Fullstack Developer",
            SpecializedInterviewType::MobileDeveloper => "Mobile Developer",
            SpecializedInterviewType::DevopsEngineer => "DevOps Engineer",
            SpecializedInterviewType::DataScientist => "Data Scientist",
            SpecializedInterviewType::UxUiDesigner => "UX/UI Designer",
            SpecializedInterviewType::ProductManager => "Product Manager",
            SpecializedInterviewType::QaEngineer => "QA Engineer",
            SpecializedInterviewType::CloudArchitect => "Cloud Architect",
        }
    }
}

impl fmt::Display for SpecializedInterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seniority calibration for specialized interviews (junior, mid, senior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerLevel {
    Jr,
    Pl,
    Sr,
}

impl CareerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CareerLevel::Jr => "jr",
            CareerLevel::Pl => "pl",
            CareerLevel::Sr => "sr",
        }
    }
}

impl fmt::Display for CareerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable interview configuration captured at session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSettings {
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub interview_type: InterviewType,
    #[serde(default)]
    pub interviewer_personality: InterviewerPersonality,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
    #[serde(default = "default_duration_minutes")]
    pub interview_duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_type: Option<VoiceType>,
    #[serde(default)]
    pub product_type: InterviewProductType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialized_type: Option<SpecializedInterviewType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_level: Option<CareerLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_skills: Vec<String>,
}

fn default_difficulty() -> u8 {
    3
}

fn default_duration_minutes() -> u32 {
    15
}

impl InterviewSettings {
    /// Minimal settings for a basic interview; remaining fields take defaults.
    pub fn basic(job_title: impl Into<String>, interview_type: InterviewType) -> Self {
        Self {
            job_title: job_title.into(),
            company_name: None,
            industry: None,
            interview_type,
            interviewer_personality: InterviewerPersonality::default(),
            difficulty_level: default_difficulty(),
            interview_duration_minutes: default_duration_minutes(),
            language: None,
            voice_type: None,
            product_type: InterviewProductType::BasicInterview,
            specialized_type: None,
            career_level: None,
            candidate_experience_years: None,
            focus_areas: Vec::new(),
            custom_instructions: None,
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
        }
    }

    /// Settings for a specialized technical interview.
    pub fn specialized(
        job_title: impl Into<String>,
        specialization: SpecializedInterviewType,
        career_level: Option<CareerLevel>,
    ) -> Self {
        Self {
            product_type: InterviewProductType::Specialized,
            specialized_type: Some(specialization),
            career_level,
            ..Self::basic(job_title, InterviewType::Technical)
        }
    }

    /// The specialization in effect, if this is a specialized interview.
    ///
    /// Returns `None` for basic interviews even when a stray
    /// `specialized_type` was supplied.
    pub fn specialization(&self) -> Option<SpecializedInterviewType> {
        match self.product_type {
            InterviewProductType::Specialized => self.specialized_type,
            InterviewProductType::BasicInterview => None,
        }
    }

    pub fn is_specialized(&self) -> bool {
        self.product_type == InterviewProductType::Specialized
    }

    /// Credit key consumed when this interview starts:
    /// `specialized` or `basic_{duration}min`.
    pub fn credit_type(&self) -> String {
        match self.product_type {
            InterviewProductType::Specialized => "specialized".to_string(),
            InterviewProductType::BasicInterview => {
                format!("basic_{}min", self.interview_duration_minutes)
            }
        }
    }

    /// Check field ranges and cross-field consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.job_title.trim().is_empty() {
            return Err("job title must not be empty".to_string());
        }
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(format!(
                "difficulty level must be between 1 and 5, got {}",
                self.difficulty_level
            ));
        }
        if !(1..=120).contains(&self.interview_duration_minutes) {
            return Err(format!(
                "interview duration must be between 1 and 120 minutes, got {}",
                self.interview_duration_minutes
            ));
        }
        match (self.product_type, self.specialized_type) {
            (InterviewProductType::Specialized, None) => {
                Err("specialized interviews require a specialized type".to_string())
            }
            (InterviewProductType::BasicInterview, Some(t)) => Err(format!(
                "specialized type '{t}' requires the specialized product type"
            )),
            _ => Ok(()),
        }
    }
}

/// Lifecycle status of an interview session.
///
/// Transitions only move forward: `created -> in_progress -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Created,
    InProgress,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Created => write!(f, "created"),
            SessionStatus::InProgress => write!(f, "in_progress"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SessionStatus::Created),
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// A mock-interview session owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub settings: InterviewSettings,
    pub status: SessionStatus,
    pub duration_minutes: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Last remaining-time value reported by the client clock.
    pub remaining_time_ms: Option<i64>,
    pub last_time_update_at: Option<DateTime<Utc>>,
    /// Set once the time-running-out wrap-up has been generated.
    pub is_finishing: bool,
    pub credit_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    /// Build a fresh session in `created` state.
    pub fn new(user_id: Uuid, settings: InterviewSettings) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            duration_minutes: settings.interview_duration_minutes,
            settings,
            status: SessionStatus::Created,
            start_time: None,
            end_time: None,
            remaining_time_ms: None,
            last_time_update_at: None,
            is_finishing: false,
            credit_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

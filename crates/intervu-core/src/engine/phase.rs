//! Conversation phase tracking for specialized interviews.

use intervu_types::message::{InterviewMessage, MessageAuthor};

/// Stage of a specialized interview, derived from interviewer turn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewPhase {
    WarmUp,
    CoreTechnical,
    PracticalApplication,
    AdvancedTopics,
    Closing,
}

impl InterviewPhase {
    /// Phase for the given number of interviewer turns so far.
    pub fn from_interviewer_turns(turns: usize) -> Self {
        match turns {
            0..=4 => InterviewPhase::WarmUp,
            5..=8 => InterviewPhase::CoreTechnical,
            9..=12 => InterviewPhase::PracticalApplication,
            13..=15 => InterviewPhase::AdvancedTopics,
            _ => InterviewPhase::Closing,
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            InterviewPhase::WarmUp => {
                "CURRENT PHASE: Warm-up - Continue exploring candidate's experience and background."
            }
            InterviewPhase::CoreTechnical => {
                "CURRENT PHASE: Core Technical - Focus on main technical areas of specialization. \
                 Use transitions like 'Now let's talk about...'"
            }
            InterviewPhase::PracticalApplication => {
                "CURRENT PHASE: Practical Application - Discuss practical scenarios and \
                 problem-solving. Use 'Let's shift our focus to discuss...'"
            }
            InterviewPhase::AdvancedTopics => {
                "CURRENT PHASE: Advanced Topics - Explore advanced concepts and system thinking. \
                 Use the candidate's background to guide the conversation if possible."
            }
            InterviewPhase::Closing => {
                "CURRENT PHASE: Preparing to Close - Start directing towards interview closure."
            }
        }
    }
}

pub fn interviewer_turns(history: &[InterviewMessage]) -> usize {
    history
        .iter()
        .filter(|m| m.role == MessageAuthor::Interviewer && !m.is_blank())
        .count()
}

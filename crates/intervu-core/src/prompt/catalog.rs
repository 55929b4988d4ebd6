//! Static prompt text for the specialist tracks.

use intervu_types::interview::{CareerLevel, SpecializedInterviewType};

use super::END_INTERVIEW_MARKER;
use super::specialist::Track;

/// Seniority guidance for a track and level.
pub(crate) fn level_guidance(track: Track, level: Option<CareerLevel>) -> &'static str {
    match (track, level) {
        (Track::Backend, Some(CareerLevel::Jr)) => {
            "JUNIOR LEVEL FOCUS:
- Solid programming fundamentals and basic concepts
- Understanding of basic data structures and algorithms
- Basic database knowledge and query skills
- Look for growth potential and willingness to learn
- Less focus on complex architecture, more on solid foundations"
        }
        (Track::Backend, Some(CareerLevel::Pl)) => {
            "MID-LEVEL FOCUS:
- Practical experience with backend system development
- Intermediate knowledge of design patterns
- Ability to make independent technical decisions
- Understanding of technical trade-offs
- Start with the basics of cloud services knowledge and integration"
        }
        (Track::Backend, Some(CareerLevel::Sr)) => {
            "SENIOR LEVEL FOCUS:
- Technical leadership and ability to architect complex systems
- Experience with large-scale system design and implementation
- Ability to evaluate and recommend technologies
- Mentoring and establishing engineering standards
- Cloud services knowledge and integration"
        }
        (Track::Frontend, Some(CareerLevel::Jr)) => {
            "JUNIOR LEVEL FOCUS:
- Solid HTML, CSS, and language fundamentals
- Understanding of basic responsive design principles
- Familiarity with at least one modern frontend framework
- Ability to implement designs and handle basic user interactions
- Look for growth potential and eagerness to learn"
        }
        (Track::Frontend, Some(CareerLevel::Pl)) => {
            "MID-LEVEL FOCUS:
- Practical experience with complex frontend application development
- Intermediate knowledge of performance optimization techniques
- Experience with testing and debugging frontend applications
- Understanding of accessibility and cross-browser compatibility
- Ability to mentor junior developers and review code"
        }
        (Track::Frontend, Some(CareerLevel::Sr)) => {
            "SENIOR LEVEL FOCUS:
- Technical leadership and ability to architect complex frontend systems
- Deep understanding of performance optimization and user experience
- Ability to evaluate and recommend frontend technologies and patterns
- Experience establishing frontend standards and best practices
- Look for architectural vision and project impact"
        }
        (Track::Fullstack, Some(CareerLevel::Jr)) => {
            "JUNIOR LEVEL FOCUS:
- Solid understanding of both frontend and backend fundamentals
- Basic knowledge of how client-server communication works
- Understanding of basic database concepts and API consumption
- Ability to implement complete features from UI to data layer
- Look for learning agility across the stack"
        }
        (Track::Fullstack, Some(CareerLevel::Pl)) => {
            "MID-LEVEL FOCUS:
- Practical experience developing complete full-stack applications
- Intermediate knowledge of system integration and API design
- Experience with debugging and troubleshooting across the stack
- Understanding of performance implications at different levels
- Ability to balance frontend and backend concerns effectively"
        }
        (Track::Fullstack, Some(CareerLevel::Sr)) => {
            "SENIOR LEVEL FOCUS:
- Technical leadership and ability to architect complex full-stack systems
- Deep understanding of system design and technology trade-offs
- Ability to evaluate and recommend technologies across the entire stack
- Mentoring and developing full-stack teams
- Look for architectural vision and system-wide impact"
        }
        (Track::Technical, Some(CareerLevel::Jr)) => {
            "JUNIOR LEVEL FOCUS:
- Solid fundamentals and basic concepts
- Willingness to learn and adapt
- Theoretical knowledge and initial experience
- Look for growth potential and learning attitude"
        }
        (Track::Technical, Some(CareerLevel::Pl)) => {
            "MID-LEVEL FOCUS:
- Practical experience with real projects
- Ability to make independent technical decisions
- Knowledge of trade-offs and best practices
- Balance between guidance and autonomy"
        }
        (Track::Technical, Some(CareerLevel::Sr)) => {
            "SENIOR LEVEL FOCUS:
- Technical leadership and architectural vision
- Experience with complex and large-scale systems
- Mentoring and team development capabilities
- Strategic vision and business alignment"
        }
        (_, None) => {
            "GENERAL FOCUS:
- Adapt questions to the apparent experience level of the candidate
- Balance fundamental knowledge with practical application
- Look for problem-solving approach and communication skills"
        }
    }
}

/// Names and minute budgets of the five curriculum phases.
pub(crate) fn phases(track: Track) -> [(&'static str, &'static str); 5] {
    match track {
        Track::Backend => [
            ("WARM-UP AND EXPERIENCE REVIEW", "3-6 minutes"),
            ("CORE TECHNICAL COMPETENCIES", "8-12 minutes"),
            ("SYSTEM DESIGN AND ARCHITECTURE", "6-10 minutes"),
            ("ADVANCED TOPICS AND PROBLEM SOLVING", "3-6 minutes"),
            ("CLOSING", "2-4 minutes"),
        ],
        Track::Frontend => [
            ("WARM-UP AND EXPERIENCE REVIEW", "3-9 minutes"),
            ("CORE TECHNICAL COMPETENCIES", "8-12 minutes"),
            ("UI/UX IMPLEMENTATION AND DESIGN", "6-10 minutes"),
            ("ADVANCED TOPICS AND PROBLEM SOLVING", "4-8 minutes"),
            ("CLOSING", "2-4 minutes"),
        ],
        Track::Fullstack => [
            ("WARM-UP AND EXPERIENCE REVIEW", "3-5 minutes"),
            ("FRONTEND AND BACKEND ASSESSMENT", "10-14 minutes"),
            ("SYSTEM INTEGRATION AND ARCHITECTURE", "6-8 minutes"),
            ("ADVANCED TOPICS AND PROBLEM SOLVING", "4-6 minutes"),
            ("CLOSING", "2-3 minutes"),
        ],
        Track::Technical => [
            ("WARM-UP AND EXPERIENCE", "3-6 minutes"),
            ("CORE TECHNICAL COMPETENCIES", "8-12 minutes"),
            ("PRACTICAL APPLICATION AND PROBLEM SOLVING", "6-10 minutes"),
            ("ADVANCED TOPICS AND SYSTEM THINKING", "3-6 minutes"),
            ("CLOSING", "2-4 minutes"),
        ],
    }
}

fn phase_details(track: Track, index: usize) -> &'static [&'static str] {
    match (track, index) {
        (_, 0) => &[
            "Brief personal introduction",
            "Most relevant experience for the role",
            "Technologies and tools they enjoy working with",
            "Most challenging recent project or problem solved",
        ],
        (Track::Fullstack, 1) => &[
            "User interface implementation and frontend performance",
            "Server-side architecture, API development and data management",
            "Use clear transitions: \"Now let's talk about the backend side...\"",
        ],
        (_, 1) => &[
            "Choose 2-3 main technical areas based on the candidate's level and experience",
            "Ask progressive questions (concept, then application, then trade-offs)",
            "Use clear transitions: \"Now let's talk about...\"",
        ],
        (Track::Backend, 2) => &[
            "Practical system design scenario or architectural discussion",
            "Scalability, performance and security considerations",
            "Use: \"Let's shift our focus to discuss...\"",
        ],
        (Track::Frontend, 2) => &[
            "Practical UI implementation scenarios or design challenges",
            "Responsive design, accessibility and user experience",
            "Use: \"Let's shift our focus to discuss...\"",
        ],
        (Track::Fullstack, 2) => &[
            "End-to-end system design and data flow",
            "API integration and communication patterns",
            "Use: \"Now let's discuss how you integrate these components...\"",
        ],
        (Track::Technical, 2) => &[
            "Real-world scenarios and case studies",
            "System design or architectural discussions",
            "Use: \"Let's shift our focus to discuss...\"",
        ],
        (_, 3) => &[
            "Troubleshooting scenario or complex problem solving",
            "Best practices and industry standards",
            "Experience with monitoring, debugging, or optimization",
        ],
        _ => &[
            "Candidate's questions about the role or company",
            "Next steps in the interview process",
            "Professional thank you and closing",
        ],
    }
}

/// The five-phase curriculum. The closing phase names the end marker.
pub(crate) fn curriculum(track: Track) -> String {
    let mut lines = vec!["INTERVIEW STRUCTURE:".to_string()];
    for (index, (name, minutes)) in phases(track).iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {name} ({minutes}):", index + 1));
        for detail in phase_details(track, index) {
            lines.push(format!("  - {detail}"));
        }
        if index == 4 {
            lines.push(format!(
                "  - IMPORTANT: End with {END_INTERVIEW_MARKER} marker after your final response"
            ));
        }
    }
    lines.push(String::new());
    lines.push(
        "IMPORTANT: Use transition phrases between sections to maintain structured flow and \
         ensure natural progression through topics."
            .to_string(),
    );
    lines.join("\n")
}

const BACKEND_COMPETENCIES: &[&str] = &[
    "SOFTWARE ARCHITECTURE & DESIGN: design principles, modular code organization, design patterns",
    "API DEVELOPMENT & INTEGRATION: API design, authentication and authorization, versioning",
    "CLOUD SERVICES & INTEGRATION (PL & SR ONLY): serverless, containers, cloud security",
    "DATABASE MANAGEMENT: data modeling, query optimization, transactions and consistency",
    "SECURITY IMPLEMENTATION: common vulnerabilities, input validation, encryption",
    "PERFORMANCE & SCALABILITY: caching, load balancing, bottleneck identification",
    "SYSTEM DESIGN & ARCHITECTURE: scalability trade-offs, fault tolerance, distributed systems",
];

const FRONTEND_COMPETENCIES: &[&str] = &[
    "LANGUAGE FUNDAMENTALS: modern language features, asynchronous programming, browser APIs",
    "FRONTEND FRAMEWORKS & LIBRARIES: component architecture, state management, routing",
    "CSS & STYLING ARCHITECTURE: methodologies, responsive design, animations",
    "UI/UX IMPLEMENTATION: design systems, cross-browser compatibility, interaction patterns",
    "WEB PERFORMANCE OPTIMIZATION: code splitting, loading and rendering performance, Core Web Vitals",
    "ACCESSIBILITY & STANDARDS: semantic HTML, keyboard navigation, WCAG guidelines",
    "FRONTEND ARCHITECTURE & TOOLING: build tools, module systems, deployment",
    "BROWSER COMPATIBILITY & DEBUGGING: developer tools, error monitoring, progressive web apps",
];

const FULLSTACK_COMPETENCIES: &[&str] = &[
    "FRONTEND DEVELOPMENT SKILLS: UI implementation, framework knowledge, frontend performance",
    "BACKEND DEVELOPMENT SKILLS: server-side architecture, authentication, scalability",
    "FULLSTACK SYSTEM ARCHITECTURE: end-to-end data flow, client-server communication",
    "API DESIGN & INTEGRATION: REST principles, real-time communication, third-party services",
    "DATABASE & DATA MANAGEMENT: relational and non-relational modeling, schema evolution",
    "DEVELOPMENT WORKFLOW & TOOLING: version control, testing across the stack",
    "SECURITY & BEST PRACTICES: validation across layers, session management, OWASP",
    "DEVOPS & DEPLOYMENT AWARENESS: containers, monitoring, CI/CD pipelines",
    "PERFORMANCE OPTIMIZATION: caching at different layers, query and rendering performance",
    "PROBLEM SOLVING & SYSTEM THINKING: debugging across the stack, technology trade-offs",
];

/// Competency checklist heading plus its areas.
pub(crate) fn competencies(track: Track, specialization: SpecializedInterviewType) -> String {
    let (heading, areas) = match track {
        Track::Backend => (
            "CORE BACKEND COMPETENCY AREAS TO ASSESS:".to_string(),
            BACKEND_COMPETENCIES,
        ),
        Track::Frontend => (
            "CORE FRONTEND COMPETENCY AREAS TO ASSESS:".to_string(),
            FRONTEND_COMPETENCIES,
        ),
        Track::Fullstack => (
            "CORE FULLSTACK COMPETENCY AREAS TO ASSESS:".to_string(),
            FULLSTACK_COMPETENCIES,
        ),
        Track::Technical => (
            format!("{} FOCUS AREAS:", specialization.role_name().to_uppercase()),
            technical_focus(specialization),
        ),
    };

    let lines: Vec<String> = areas
        .iter()
        .enumerate()
        .map(|(i, area)| format!("{}. {area}", i + 1))
        .collect();
    format!("{heading}\n\n{}", lines.join("\n"))
}

fn technical_focus(specialization: SpecializedInterviewType) -> &'static [&'static str] {
    match specialization {
        SpecializedInterviewType::MobileDeveloper => &[
            "Mobile platform development approaches",
            "Mobile architecture patterns and best practices",
            "Performance optimization and memory management",
            "Device capabilities and native integrations",
            "App store deployment and distribution",
            "Cross-platform vs native considerations",
        ],
        SpecializedInterviewType::DevopsEngineer => &[
            "Infrastructure automation and management",
            "CI/CD pipeline design and implementation",
            "Containerization and orchestration",
            "Cloud platforms and services",
            "Monitoring, logging, and observability",
            "Security and compliance practices",
        ],
        SpecializedInterviewType::DataScientist => &[
            "Statistical analysis and mathematical foundations",
            "Machine learning algorithms and applications",
            "Data processing and ETL pipelines",
            "Data visualization and communication",
            "Big data technologies and cloud platforms",
            "Business intelligence and metrics interpretation",
        ],
        SpecializedInterviewType::UxUiDesigner => &[
            "User experience research and design principles",
            "User interface design and prototyping",
            "Design systems and component libraries",
            "Usability testing and user feedback",
            "Collaboration with development teams",
            "Accessibility and inclusive design",
        ],
        SpecializedInterviewType::ProductManager => &[
            "Product strategy and roadmap planning",
            "Market research and user needs analysis",
            "Cross-functional team collaboration",
            "Data-driven decision making",
            "Product lifecycle management",
            "Stakeholder communication and alignment",
        ],
        SpecializedInterviewType::QaEngineer => &[
            "Testing methodologies and strategies",
            "Test automation frameworks and tools",
            "Performance and security testing",
            "Quality processes and metrics",
            "CI/CD integration and testing",
            "Risk assessment and management",
        ],
        SpecializedInterviewType::CloudArchitect => &[
            "Cloud platform services and capabilities",
            "Infrastructure design and scalability",
            "Security frameworks and compliance",
            "Cost optimization strategies",
            "Migration and modernization approaches",
            "Multi-cloud and hybrid architectures",
        ],
        // Routed to their dedicated tracks; kept for completeness.
        SpecializedInterviewType::BackendDeveloper
        | SpecializedInterviewType::FrontendDeveloper
        | SpecializedInterviewType::FullstackDeveloper => &[
            "Core competencies specific to this role",
            "Industry best practices and standards",
            "Problem-solving and analytical thinking",
            "Technical knowledge and practical application",
        ],
    }
}

pub(crate) fn discussion_guidelines(track: Track) -> &'static str {
    match track {
        Track::Fullstack => {
            "TECHNICAL DISCUSSION GUIDELINES:
- Balance questions between frontend, backend, and integration topics
- Use phrases like \"How would you architect...\" or \"Describe your approach to...\"
- Focus on reasoning, system-wide considerations, and technical trade-offs
- Avoid requesting actual code; focus on architectural and integration thinking
- Ask follow-up questions to gauge breadth and depth of understanding"
        }
        Track::Frontend => {
            "TECHNICAL DISCUSSION GUIDELINES:
- Ask candidates to explain their approach to UI problems conceptually
- Use phrases like \"How would you implement...\" or \"Describe your approach to...\"
- Focus on reasoning, user experience considerations, and technical trade-offs
- Avoid requesting actual code; focus on architectural and design thinking
- Ask follow-up questions to gauge depth of understanding"
        }
        Track::Backend | Track::Technical => {
            "TECHNICAL DISCUSSION GUIDELINES:
- Ask candidates to explain their approach conceptually
- Use phrases like \"How would you design...\" or \"Describe your approach to...\"
- Focus on reasoning, trade-offs, and decision-making process
- Encourage discussion of real-world scenarios and past experiences
- Avoid requesting actual code; focus on architectural thinking
- Ask follow-up questions to gauge depth of understanding"
        }
    }
}

pub(crate) fn transition_phrases(track: Track) -> &'static str {
    match track {
        Track::Fullstack => {
            "TRANSITION PHRASES TO USE:
- \"Now let's shift from frontend to backend topics...\"
- \"Let's discuss how you would integrate these components...\"
- \"Moving to the system architecture level...\"
- \"Now let's talk about the full-stack perspective...\""
        }
        Track::Backend | Track::Frontend | Track::Technical => {
            "TRANSITION PHRASES TO USE:
- \"Now let's move on to discuss...\"
- \"Let's shift our focus to...\"
- \"I'd like to explore another important area...\"
- \"Moving to our next topic...\""
        }
    }
}

const BACKEND_FEEDBACK: &[&str] = &[
    "technical_knowledge",
    "software_architecture",
    "api_design",
    "database_expertise",
    "security_awareness",
    "scalability_understanding",
    "problem_solving",
    "technical_communication",
];

const FRONTEND_FEEDBACK: &[&str] = &[
    "fundamentals",
    "framework_knowledge",
    "css_styling",
    "ui_ux_implementation",
    "web_performance",
    "accessibility",
    "frontend_architecture",
    "problem_solving",
    "technical_communication",
];

const FULLSTACK_FEEDBACK: &[&str] = &[
    "frontend_skills",
    "backend_skills",
    "fullstack_architecture",
    "api_integration",
    "database_design",
    "system_thinking",
    "devops_awareness",
    "problem_solving",
    "technical_communication",
    "technology_versatility",
];

const TECHNICAL_FEEDBACK: &[&str] = &[
    "technical_knowledge",
    "practical_experience",
    "problem_solving",
    "communication",
    "system_thinking",
    "best_practices",
];

/// Allowed feedback categories and the per-field character limit.
pub(crate) fn feedback_categories(track: Track) -> (&'static [&'static str], u32) {
    match track {
        Track::Backend => (BACKEND_FEEDBACK, 250),
        Track::Frontend => (FRONTEND_FEEDBACK, 250),
        Track::Fullstack => (FULLSTACK_FEEDBACK, 250),
        Track::Technical => (TECHNICAL_FEEDBACK, 300),
    }
}

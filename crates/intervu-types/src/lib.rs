//! Shared domain types for intervu.
//!
//! Interview settings and sessions, transcript messages, feedback, credits,
//! provider-agnostic LLM shapes, configuration and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod config;
pub mod credit;
pub mod error;
pub mod feedback;
pub mod interview;
pub mod llm;
pub mod message;

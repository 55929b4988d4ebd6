//! Business logic and storage port definitions for intervu.
//!
//! Prompt providers, the interview engine and the session orchestrator live
//! here. The crate depends only on `intervu-types` -- never on
//! `intervu-infra` or any database/IO crate.

pub mod engine;
pub mod interview;
pub mod llm;
pub mod prompt;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

//! Infrastructure layer for intervu.
//!
//! Implements the storage ports defined in `intervu-core` with SQLite, the
//! `LlmProvider` trait with an OpenAI-compatible client, and loads the
//! application configuration from the data directory.

pub mod config;
pub mod llm;
pub mod sqlite;

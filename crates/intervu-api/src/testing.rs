//! Test fixtures: a SQLite-backed state driven by the scripted provider.

use secrecy::SecretString;
use tempfile::TempDir;
use uuid::Uuid;

use intervu_core::interview::repository::CreditLedger;
use intervu_core::interview::service::Caller;
use intervu_core::llm::box_provider::BoxLlmProvider;
use intervu_core::testing::ScriptedProvider;
use intervu_types::config::AppConfig;
use intervu_types::credit::Credit;

use crate::state::{AppState, open_database};

pub const JWT_SECRET: &str = "api-test-secret";

/// App state over a fresh temp database with the given scripted replies.
pub async fn test_state(replies: &[&str]) -> (AppState, TempDir) {
    test_state_with(ScriptedProvider::with_replies(replies)).await
}

pub async fn test_state_with(provider: ScriptedProvider) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(SecretString::from(JWT_SECRET.to_string()));

    let db_pool = open_database(dir.path(), &config).await.unwrap();
    let state = AppState::assemble(config, db_pool, BoxLlmProvider::new(provider)).unwrap();
    (state, dir)
}

/// Grant `count` credits of `credit_type` valid for a week.
pub async fn grant_credits(state: &AppState, caller: &Caller, credit_type: &str, count: u32) {
    let credit = Credit::grant(
        caller.user_id,
        credit_type,
        count,
        None,
        chrono::Duration::days(7),
    );
    state
        .interview_service
        .credits()
        .grant(&credit)
        .await
        .unwrap();
}

pub fn new_caller() -> Caller {
    Caller::user(Uuid::now_v7())
}

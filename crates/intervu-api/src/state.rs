//! Application state wiring all services together.
//!
//! The interview service is generic over its storage ports; AppState pins it
//! to the SQLite implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use intervu_core::engine::{EngineOptions, InterviewEngine};
use intervu_core::interview::service::InterviewService;
use intervu_core::llm::box_provider::BoxLlmProvider;
use intervu_core::prompt::registry::PromptProviderRegistry;
use intervu_infra::config::{database_path, database_url};
use intervu_infra::llm::create_provider;
use intervu_infra::sqlite::credit::SqliteCreditLedger;
use intervu_infra::sqlite::feedback::SqliteFeedbackRepository;
use intervu_infra::sqlite::message::SqliteMessageRepository;
use intervu_infra::sqlite::pool::DatabasePool;
use intervu_infra::sqlite::session::SqliteSessionRepository;
use intervu_types::config::AppConfig;

use crate::http::extractors::auth::TokenVerifier;
use crate::http::rooms::SessionRooms;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteInterviewService = InterviewService<
    SqliteSessionRepository,
    SqliteMessageRepository,
    SqliteCreditLedger,
    SqliteFeedbackRepository,
>;

/// Shared state for REST handlers and realtime connections.
#[derive(Clone)]
pub struct AppState {
    pub interview_service: Arc<ConcreteInterviewService>,
    pub rooms: Arc<SessionRooms>,
    pub token_verifier: Arc<TokenVerifier>,
    pub config: Arc<AppConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database, build the completion provider and wire the
    /// interview service.
    pub async fn init(data_dir: &Path, config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = open_database(data_dir, &config).await?;
        let provider = create_provider(&config.llm).context("failed to configure LLM provider")?;
        Self::assemble(config, db_pool, provider)
    }

    /// Wire the state from already-built parts.
    pub fn assemble(
        config: AppConfig,
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
    ) -> anyhow::Result<Self> {
        let jwt_secret = config.auth.jwt_secret.as_ref().context(
            "no JWT secret configured; set [auth] jwt_secret in config.toml or INTERVU_JWT_SECRET",
        )?;
        let token_verifier = TokenVerifier::new(jwt_secret);

        let engine = InterviewEngine::new(
            provider,
            PromptProviderRegistry::with_defaults(),
            EngineOptions {
                model: config.llm.model.clone(),
                max_tokens: Some(config.llm.max_tokens),
            },
        );

        let interview_service = InterviewService::new(
            SqliteSessionRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            SqliteCreditLedger::new(db_pool.clone()),
            SqliteFeedbackRepository::new(db_pool.clone()),
            engine,
        );

        Ok(Self {
            interview_service: Arc::new(interview_service),
            rooms: Arc::new(SessionRooms::new()),
            token_verifier: Arc::new(token_verifier),
            config: Arc::new(config),
            db_pool,
        })
    }
}

/// Create the data directory and open (and migrate) the database.
pub async fn open_database(
    data_dir: &Path,
    config: &AppConfig,
) -> anyhow::Result<DatabasePool> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let db_path = database_path(config, data_dir);
    tracing::debug!(path = %db_path.display(), "Opening database");
    let db_pool = DatabasePool::new(&database_url(&db_path))
        .await
        .context("failed to open database")?;
    Ok(db_pool)
}

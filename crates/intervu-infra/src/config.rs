//! Application configuration loader for intervu.
//!
//! Reads `config.toml` from the data directory (`~/.intervu/` in production),
//! deserializes it into [`AppConfig`], then applies environment overrides.
//! Falls back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use intervu_types::config::AppConfig;
use secrecy::SecretString;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "INTERVU_DATA_DIR";

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const MODEL_ENV: &str = "OPENAI_CHAT_MODEL";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const JWT_SECRET_ENV: &str = "INTERVU_JWT_SECRET";

/// Resolve the data directory: `INTERVU_DATA_DIR`, else `~/.intervu`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".intervu")
}

/// Database file for a configuration: `database.path` if set (relative
/// paths resolve against the data directory), else `{data_dir}/intervu.db`.
pub fn database_path(config: &AppConfig, data_dir: &Path) -> PathBuf {
    match &config.database.path {
        Some(path) => data_dir.join(path),
        None => data_dir.join("intervu.db"),
    }
}

/// sqlx connection URL for a database file, created on first use.
pub fn database_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Load `{data_dir}/config.toml` and apply environment overrides.
///
/// - If the file does not exist, starts from [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and starts from the default.
/// - Environment variables always win over file values.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let mut config = load_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

async fn load_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Overlay environment values. `lookup` is injectable so tests do not touch
/// the process environment.
fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(API_KEY_ENV) {
        config.llm.api_key = Some(SecretString::from(key));
    }
    if let Some(model) = non_empty(MODEL_ENV) {
        config.llm.model = model;
    }
    if let Some(url) = non_empty(BASE_URL_ENV) {
        config.llm.base_url = Some(url);
    }
    if let Some(secret) = non_empty(JWT_SECRET_ENV) {
        config.auth.jwt_secret = Some(SecretString::from(secret));
    }
}

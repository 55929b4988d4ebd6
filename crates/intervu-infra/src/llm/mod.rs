//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](intervu_core::llm::provider::LlmProvider)
//! used by the interview engine and a factory ([`create_provider`]) that
//! builds it from the `[llm]` configuration section.

pub mod openai;

use intervu_core::llm::box_provider::BoxLlmProvider;
use intervu_types::config::LlmConfig;
use intervu_types::llm::LlmError;

use self::openai::OpenAiCompatibleProvider;
use self::openai::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] from the `[llm]` configuration.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is configured.
pub fn create_provider(config: &LlmConfig) -> Result<BoxLlmProvider, LlmError> {
    let oai_config = OpenAiCompatConfig::from_llm_config(config)?;
    tracing::info!(
        provider = %oai_config.provider_name,
        base_url = %oai_config.base_url,
        model = %oai_config.model,
        "LLM provider configured"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
}

//! Configuration for the OpenAI-compatible chat-completions provider.

use secrecy::SecretString;

use intervu_types::config::LlmConfig;
use intervu_types::llm::LlmError;

/// Base URL used when none is configured.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
///
/// Does NOT derive Debug so the API key cannot end up in logs.
pub struct OpenAiCompatConfig {
    /// Name reported in `gen_ai.system` span fields.
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model when a request leaves `model` empty.
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build from the `[llm]` section. Fails without an API key.
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(LlmError::AuthenticationFailed)?;
        let (provider_name, base_url) = match config.base_url.as_deref() {
            Some(url) if url.trim_end_matches('/') != OPENAI_BASE_URL => {
                ("openai_compatible", url.trim_end_matches('/').to_string())
            }
            _ => ("openai", OPENAI_BASE_URL.to_string()),
        };

        Ok(Self {
            provider_name: provider_name.to_string(),
            base_url,
            api_key,
            model: config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_missing_key_is_authentication_error() {
        let config = LlmConfig::default();
        assert!(matches!(
            OpenAiCompatConfig::from_llm_config(&config),
            Err(LlmError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_defaults_to_openai() {
        let config = LlmConfig {
            api_key: Some(SecretString::from("sk-test".to_string())),
            ..LlmConfig::default()
        };
        let oai = OpenAiCompatConfig::from_llm_config(&config).unwrap();
        assert_eq!(oai.provider_name, "openai");
        assert_eq!(oai.base_url, OPENAI_BASE_URL);
        assert_eq!(oai.model, "gpt-4o");
        assert_eq!(oai.api_key.expose_secret(), "sk-test");
    }

    #[test]
    fn test_custom_base_url() {
        let config = LlmConfig {
            api_key: Some(SecretString::from("local".to_string())),
            base_url: Some("http://localhost:11434/v1/".to_string()),
            model: "llama3.1".to_string(),
            ..LlmConfig::default()
        };
        let oai = OpenAiCompatConfig::from_llm_config(&config).unwrap();
        assert_eq!(oai.provider_name, "openai_compatible");
        assert_eq!(oai.base_url, "http://localhost:11434/v1");
        assert_eq!(oai.model, "llama3.1");
    }
}

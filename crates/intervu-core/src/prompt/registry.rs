//! Ordered registry that selects the prompt provider for a session.

use intervu_types::error::InterviewError;
use intervu_types::interview::InterviewSettings;
use tracing::debug;

use super::PromptProvider;
use super::base::BasePromptProvider;
use super::specialist::{SpecialistPromptProvider, Track};

/// First-match registry of prompt providers.
///
/// Assembled once at process start and shared read-only afterwards.
#[derive(Default)]
pub struct PromptProviderRegistry {
    providers: Vec<Box<dyn PromptProvider>>,
}

impl PromptProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard providers: backend, frontend, fullstack,
    /// technical, base.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SpecialistPromptProvider::new(Track::Backend));
        registry.register(SpecialistPromptProvider::new(Track::Frontend));
        registry.register(SpecialistPromptProvider::new(Track::Fullstack));
        registry.register(SpecialistPromptProvider::new(Track::Technical));
        registry.register(BasePromptProvider::new());
        registry
    }

    /// Append a provider. Earlier registrations take precedence.
    pub fn register<P: PromptProvider + 'static>(&mut self, provider: P) {
        self.providers.push(Box::new(provider));
    }

    /// Provider names in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The first provider whose predicate accepts the settings.
    pub fn get_provider(
        &self,
        settings: &InterviewSettings,
    ) -> Result<&dyn PromptProvider, InterviewError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.can_handle(settings))
            .ok_or_else(|| {
                InterviewError::Configuration(format!(
                    "no prompt provider registered for interview type: {}, specialized type: {}",
                    settings.interview_type,
                    settings
                        .specialized_type
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "none".to_string())
                ))
            })?;
        debug!(provider = provider.name(), "Selected prompt provider");
        Ok(provider.as_ref())
    }
}

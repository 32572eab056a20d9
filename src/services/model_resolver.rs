use log::{debug, warn};
use std::sync::Arc;

use crate::config::AiConfig;
use crate::context::RequestContext;
use crate::error::ModelError;
use crate::providers::{ApiKey, ModelProvider, ModelType, Provider, ProviderFactory};
use crate::store::AiConfigStore;

/// The system-wide model and keys, used when a user has no preference or key of their own.
#[derive(Debug, Clone)]
pub struct SystemDefaults {
    pub model_type: ModelType,
    pub openai_key: Option<ApiKey>,
    pub anthropic_key: Option<ApiKey>,
}

impl SystemDefaults {
    /// Fails if the configured default model is not one we support.
    pub fn from_config(config: &AiConfig) -> Result<Self, ModelError> {
        let key = |value: &Option<String>| {
            value
                .as_deref()
                .map(ApiKey::from)
                .filter(|key| !key.is_empty())
        };

        Ok(Self {
            model_type: ModelType::from_provider_version(
                &config.default_provider,
                &config.default_model,
            )?,
            openai_key: key(&config.openai_api_key),
            anthropic_key: key(&config.anthropic_api_key),
        })
    }

    pub fn key_for(&self, provider: Provider) -> Option<&ApiKey> {
        match provider {
            Provider::OpenAi => self.openai_key.as_ref(),
            Provider::Anthropic => self.anthropic_key.as_ref(),
        }
    }
}

/// A user's own key wins; a blank one counts as absent.
pub fn resolve_api_key(user_key: Option<&str>, system_key: Option<&ApiKey>) -> Option<ApiKey> {
    user_key
        .map(ApiKey::from)
        .filter(|key| !key.is_empty())
        .or_else(|| system_key.cloned())
}

/// Picks the model and key for each request.
pub struct ModelResolver {
    factory: ProviderFactory,
    defaults: SystemDefaults,
    preferences: Arc<dyn AiConfigStore>,
}

impl ModelResolver {
    pub fn new(
        factory: ProviderFactory,
        defaults: SystemDefaults,
        preferences: Arc<dyn AiConfigStore>,
    ) -> Self {
        Self {
            factory,
            defaults,
            preferences,
        }
    }

    /// Build the provider for `user_id`.
    ///
    /// A stored preference naming an unknown model is an error. A failed
    /// preference lookup is not; the request falls back to the system default.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<ModelProvider, ModelError> {
        let preference = match ctx.run(self.preferences.default_config(user_id)).await? {
            Ok(preference) => preference,
            Err(e) => {
                warn!(
                    "Failed to load model preference for user {}, using system default: {}",
                    user_id, e
                );
                None
            }
        };

        let (model_type, user_key) = match &preference {
            Some(config) => (
                ModelType::from_provider_version(
                    &config.model.provider,
                    &config.model.model_version,
                )?,
                Some(config.api_key.as_str()),
            ),
            None => (self.defaults.model_type, None),
        };

        let provider = model_type.provider();
        let api_key = resolve_api_key(user_key, self.defaults.key_for(provider)).ok_or(
            ModelError::MissingApiKey {
                provider: provider.as_str(),
            },
        )?;
        debug!("Using {} for user {}", model_type, user_id);

        Ok(self.factory.create(model_type, api_key))
    }
}

use reqwest::Client;
use std::fmt;

use super::{AnthropicProvider, ApiKey, ModelProvider, OpenAIProvider};
use crate::config::AiConfig;
use crate::error::ModelError;

/// The vendor behind a model; each one needs its own API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

/// Every model the pipeline can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    Gpt4,
    Gpt4o,
    Gpt35Turbo,
    Claude37Sonnet,
    Claude35Sonnet,
}

/// (provider, stored version, model). Several stored versions may name one model.
const MODEL_TABLE: &[(&str, &str, ModelType)] = &[
    ("openai", "gpt-4", ModelType::Gpt4),
    ("openai", "gpt-4o", ModelType::Gpt4o),
    ("openai", "gpt-3.5-turbo", ModelType::Gpt35Turbo),
    ("anthropic", "claude-3-7-sonnet-latest", ModelType::Claude37Sonnet),
    ("anthropic", "claude-2", ModelType::Claude37Sonnet),
    ("anthropic", "claude-3-5-sonnet-latest", ModelType::Claude35Sonnet),
];

impl ModelType {
    pub const DEFAULT: ModelType = ModelType::Claude37Sonnet;

    /// Resolve a stored `(provider, version)` pair. Unknown pairs are a configuration error.
    pub fn from_provider_version(provider: &str, version: &str) -> Result<Self, ModelError> {
        let provider_key = provider.trim().to_ascii_lowercase();
        let version_key = version.trim().to_ascii_lowercase();
        MODEL_TABLE
            .iter()
            .find(|(p, v, _)| *p == provider_key && *v == version_key)
            .map(|(_, _, model)| *model)
            .ok_or_else(|| ModelError::UnsupportedModel {
                provider: provider.to_string(),
                version: version.to_string(),
            })
    }

    pub fn provider(&self) -> Provider {
        match self {
            ModelType::Gpt4 | ModelType::Gpt4o | ModelType::Gpt35Turbo => Provider::OpenAi,
            ModelType::Claude37Sonnet | ModelType::Claude35Sonnet => Provider::Anthropic,
        }
    }

    /// The model id sent to the provider's API
    pub fn api_model(&self) -> &'static str {
        match self {
            ModelType::Gpt4 => "gpt-4",
            ModelType::Gpt4o => "gpt-4o",
            ModelType::Gpt35Turbo => "gpt-3.5-turbo",
            ModelType::Claude37Sonnet => "claude-3-7-sonnet-latest",
            ModelType::Claude35Sonnet => "claude-3-5-sonnet-latest",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.provider().as_str(), self.api_model())
    }
}

/// Builds providers that all share one HTTP client.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so
/// concurrent requests each get their own provider without their own pool.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    client: Client,
    config: AiConfig,
}

impl ProviderFactory {
    pub fn new(config: &AiConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| ModelError::Transport {
                provider: "http client",
                source,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn create(&self, model_type: ModelType, api_key: ApiKey) -> ModelProvider {
        let client = self.client.clone();
        match model_type.provider() {
            Provider::OpenAi => ModelProvider::OpenAi(OpenAIProvider::new(
                client,
                api_key,
                model_type.api_model(),
                &self.config,
            )),
            Provider::Anthropic => ModelProvider::Anthropic(AnthropicProvider::new(
                client,
                api_key,
                model_type.api_model(),
                &self.config,
            )),
        }
    }
}

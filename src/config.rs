use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Model provider configuration
    #[serde(default)]
    pub ai: AiConfig,
    /// Content fetching configuration
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Model provider configuration and the system-wide defaults
#[derive(Deserialize, Clone)]
pub struct AiConfig {
    /// Provider of the system default model (e.g., "anthropic")
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Version of the system default model (e.g., "claude-3-7-sonnet-latest")
    #[serde(default = "default_model")]
    pub default_model: String,
    /// System OpenAI key, used when a user has none of their own
    pub openai_api_key: Option<String>,
    /// System Anthropic key, used when a user has none of their own
    pub anthropic_api_key: Option<String>,
    /// Base URL for the OpenAI API (for proxies)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// Base URL for the Anthropic API (for proxies)
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Model request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: default_model(),
            openai_api_key: None,
            anthropic_api_key: None,
            openai_base_url: default_openai_base_url(),
            anthropic_base_url: default_anthropic_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_ai_timeout(),
        }
    }
}

impl AiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AiConfig")
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration for retrieving web content
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Redirects followed before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Identifying User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            timeout: default_fetch_timeout(),
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// Default value functions
fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-3-7-sonnet-latest".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.2
}

fn default_ai_timeout() -> u64 {
    60
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    "Recipe Parser Bot/1.0".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_INGEST__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_INGEST__AI__ANTHROPIC_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: RECIPE_INGEST__FETCH__MAX_REDIRECTS
            .add_source(
                Environment::with_prefix("RECIPE_INGEST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.ai.default_provider, "anthropic");
        assert_eq!(config.ai.default_model, "claude-3-7-sonnet-latest");
        assert_eq!(config.ai.max_tokens, 2000);
        assert_eq!(config.fetch.max_redirects, 10);
        assert_eq!(config.fetch.user_agent, "Recipe Parser Bot/1.0");
        assert_eq!(config.fetch.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_sources_deserialize_to_defaults() {
        let config: AppConfig = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.ai.openai_base_url, "https://api.openai.com");
        assert!(config.ai.anthropic_api_key.is_none());
        assert_eq!(config.fetch.max_redirects, 10);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AiConfig {
            openai_api_key: Some("sk-very-secret".to_string()),
            ..AiConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}

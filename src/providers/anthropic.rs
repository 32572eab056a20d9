use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

use super::{read_response, ApiKey, CompletionBackend};
use crate::config::AiConfig;
use crate::error::ModelError;

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";

/// Claude-family models through the messages API
pub struct AnthropicProvider {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: ApiKey, model: &str, config: &AiConfig) -> Self {
        AnthropicProvider {
            client,
            api_key,
            base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for AnthropicProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ]
            }))
            .send()
            .await
            .map_err(|source| ModelError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let response_body = read_response(PROVIDER, &self.api_key, response).await?;

        // Text is spread over content blocks; tool or thinking blocks carry none
        let text: String = response_body["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(ModelError::EmptyResponse { provider: PROVIDER });
        }
        debug!("{} returned {} chars", self.model, text.len());

        Ok(text.to_string())
    }
}

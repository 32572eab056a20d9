use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

use super::{read_response, ApiKey, CompletionBackend};
use crate::config::AiConfig;
use crate::error::ModelError;

const PROVIDER: &str = "openai";

/// GPT-family models through the chat completions API
pub struct OpenAIProvider {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    pub fn new(client: Client, api_key: ApiKey, model: &str, config: &AiConfig) -> Self {
        OpenAIProvider {
            client,
            api_key,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAIProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await
            .map_err(|source| ModelError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let response_body = read_response(PROVIDER, &self.api_key, response).await?;
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or(ModelError::EmptyResponse { provider: PROVIDER })?;
        debug!("{} returned {} chars", self.model, content.len());

        Ok(content.to_string())
    }
}

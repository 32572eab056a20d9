//! Model providers: the LLM backends that turn unstructured text into JSON.
//!
//! [`ModelProvider`] is a closed set of backends, picked through
//! [`ProviderFactory`] from a [`ModelType`]. Every variant offers the same
//! three capabilities and runs its HTTP call through the caller's
//! [`RequestContext`], so cancelling a request aborts the model call.

mod anthropic;
mod api_key;
mod factory;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use api_key::ApiKey;
pub use factory::{ModelType, Provider, ProviderFactory};
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use log::debug;
use reqwest::Response;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::{ModelError, NormalizeError};
use crate::model::{Instruction, Recipe};
use crate::normalizer;

/// A single prompt-in, text-out exchange with one vendor's API
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &'static str;

    /// The model id sent with every request
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

pub enum ModelProvider {
    OpenAi(OpenAIProvider),
    Anthropic(AnthropicProvider),
}

impl ModelProvider {
    fn backend(&self) -> &dyn CompletionBackend {
        match self {
            ModelProvider::OpenAi(provider) => provider,
            ModelProvider::Anthropic(provider) => provider,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend().provider_name()
    }

    pub fn model(&self) -> &str {
        self.backend().model()
    }

    async fn complete(&self, ctx: &RequestContext, prompt: String) -> Result<String, ModelError> {
        ctx.run(self.backend().complete(&prompt)).await?
    }

    /// Turn `content` into a recipe. `content_type` tells the model what it is looking at.
    pub async fn parse(
        &self,
        ctx: &RequestContext,
        content: &str,
        content_type: &str,
    ) -> Result<Recipe, ModelError> {
        let response = self
            .complete(ctx, prompt::build_recipe_prompt(content, content_type))
            .await?;
        Ok(normalizer::parse_recipe_response(&response)?)
    }

    pub async fn parse_instructions(
        &self,
        ctx: &RequestContext,
        text: &str,
    ) -> Result<Vec<Instruction>, ModelError> {
        let response = self
            .complete(ctx, prompt::build_instructions_prompt(text))
            .await?;
        Ok(normalizer::parse_instructions_response(&response)?)
    }

    /// One category label per item, in item order.
    ///
    /// Items the model skipped get an empty label; callers treat those as uncategorized.
    pub async fn categorize_items(
        &self,
        ctx: &RequestContext,
        items: &[String],
    ) -> Result<Vec<String>, ModelError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .complete(ctx, prompt::build_categorize_prompt(items))
            .await?;
        Ok(normalizer::parse_categories_response(&response, items)?)
    }
}

/// Read a provider response body, turning non-2xx statuses into [`ModelError::Status`].
async fn read_response(
    provider: &'static str,
    api_key: &ApiKey,
    response: Response,
) -> Result<Value, ModelError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ModelError::Transport { provider, source })?;
    debug!("{} response ({}): {}", provider, status, api_key.redact(&body));

    if !status.is_success() {
        return Err(ModelError::Status {
            provider,
            status: status.as_u16(),
            message: api_key.redact(&error_message(&body)),
        });
    }

    Ok(serde_json::from_str(&body).map_err(NormalizeError::from)?)
}

/// Both vendors report failures as `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            value["error"]["message"]
                .as_str()
                .or_else(|| value["error"].as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

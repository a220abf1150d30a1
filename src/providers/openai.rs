use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use serde_json::json;

use crate::errors::ProviderError;

use super::{Provider, ProviderClient, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, SYSTEM_PROMPT};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Chat-completions client for OpenAI and OpenAI-compatible endpoints.
/// Groq speaks the same wire protocol behind a different base URL.
pub struct OpenAiCompatClient {
    provider: Provider,
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatClient {
    pub fn openai(api_key: String, model: String) -> Self {
        Self::with_base(Provider::OpenAi, None, api_key, model)
    }

    pub fn groq(api_key: String, model: String) -> Self {
        Self::with_base(Provider::Groq, Some(GROQ_API_BASE), api_key, model)
    }

    fn with_base(
        provider: Provider,
        api_base: Option<&str>,
        api_key: String,
        model: String,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Self {
            provider,
            client: Client::with_config(config),
            model,
        }
    }

    fn request_failed(&self, message: impl std::fmt::Display) -> ProviderError {
        ProviderError::RequestFailed {
            provider: self.provider.label().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": DEFAULT_MAX_TOKENS,
            "temperature": DEFAULT_TEMPERATURE,
        });

        let response: serde_json::Value = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(|err| self.request_failed(err))?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_owned);

        log::info!(
            "{} returned {} characters",
            self.provider,
            content.as_deref().map(str::len).unwrap_or(0)
        );

        content.ok_or_else(|| ProviderError::EmptyResponse {
            provider: self.provider.label().to_string(),
        })
    }
}

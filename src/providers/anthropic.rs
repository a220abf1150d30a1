use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::ProviderError;

use super::{Provider, ProviderClient, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, SYSTEM_PROMPT};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic (Claude) messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    fn request_failed(&self, message: impl std::fmt::Display) -> ProviderError {
        ProviderError::RequestFailed {
            provider: Provider::Anthropic.label().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model,
            "max_tokens": DEFAULT_MAX_TOKENS,
            "temperature": DEFAULT_TEMPERATURE,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": prompt },
            ],
        });

        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.request_failed(err))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(self.request_failed(format!("status {}: {}", status, detail)));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|err| self.request_failed(err))?;

        // Claude returns content in blocks; the completion text is the first one
        value["content"][0]["text"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: Provider::Anthropic.label().to_string(),
            })
    }
}

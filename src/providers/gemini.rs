use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::ProviderError;

use super::{Provider, ProviderClient, DEFAULT_TEMPERATURE, SYSTEM_PROMPT};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Google Gemini generateContent API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    fn request_failed(&self, message: impl std::fmt::Display) -> ProviderError {
        ProviderError::RequestFailed {
            provider: Provider::GoogleGemini.label().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        // Gemini has no separate system role; prepend the system prompt
        let body = json!({
            "contents": [
                { "parts": [ { "text": format!("{}\n\n{}", SYSTEM_PROMPT, prompt) } ] },
            ],
            "generationConfig": {
                "temperature": DEFAULT_TEMPERATURE,
            },
        });

        let response = self
            .http
            .post(&url)
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

        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: Provider::GoogleGemini.label().to_string(),
            })
    }
}

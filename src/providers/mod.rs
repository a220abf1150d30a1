pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatClient;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::{config::Config, errors::ProviderError};

pub const SYSTEM_PROMPT: &str =
    "You are an educational content creator. Follow the provided instructions precisely.";
pub const DEFAULT_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The configurable LLM API backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Groq,
    OpenAi,
    Anthropic,
    GoogleGemini,
}

impl Provider {
    pub fn all() -> [Provider; 4] {
        [
            Provider::Groq,
            Provider::OpenAi,
            Provider::Anthropic,
            Provider::GoogleGemini,
        ]
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "groq" => Some(Provider::Groq),
            "openai" => Some(Provider::OpenAi),
            "claude" | "anthropic" => Some(Provider::Anthropic),
            "google gemini" | "google_gemini" | "gemini" => Some(Provider::GoogleGemini),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Claude",
            Provider::GoogleGemini => "Google Gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Groq => "mistral-saba-24b",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-sonnet-20241022",
            Provider::GoogleGemini => "gemini-1.5-flash",
        }
    }

    pub fn available_models(&self) -> &'static [&'static str] {
        match self {
            Provider::Groq => &[
                "mistral-saba-24b",
                "deepseek-r1-distill-llama-70b",
                "qwen-qwq-32b",
                "llama-3.3-70b-versatile",
                "gemma2-9b-it",
            ],
            Provider::OpenAi => &["gpt-4o-mini"],
            Provider::Anthropic => &["claude-3-5-sonnet-20241022"],
            Provider::GoogleGemini => &["gemini-1.5-flash"],
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Context window size per model, used to budget how much document text can
/// be embedded in a prompt.
pub fn token_limit(model: &str) -> usize {
    match model {
        // Groq
        "mistral-saba-24b" => 32 * 1024,
        "deepseek-r1-distill-llama-70b" => 128 * 1024,
        "qwen-qwq-32b" => 128 * 1024,
        "llama-3.3-70b-versatile" => 128 * 1024,
        "gemma2-9b-it" => 8192,
        // OpenAI
        "gpt-4o-mini" => 16384,
        // Anthropic
        "claude-3-5-sonnet-20241022" => 200_000,
        // Google
        "gemini-1.5-flash" => 32768,
        _ => 8192,
    }
}

/// One prompt in, one raw completion out. Implementations never retry; retry
/// policy belongs to whoever calls the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Builds the client for a provider choice, resolving the API key from the
/// request (if given) or from configuration.
pub fn client_for(
    provider: Provider,
    api_key: Option<&str>,
    model: Option<&str>,
    config: &Config,
) -> Result<Box<dyn ProviderClient>, ProviderError> {
    let api_key = resolve_api_key(provider, api_key, config)?;
    let model = model.unwrap_or_else(|| provider.default_model()).to_string();

    Ok(match provider {
        Provider::Groq => Box::new(OpenAiCompatClient::groq(api_key, model)),
        Provider::OpenAi => Box::new(OpenAiCompatClient::openai(api_key, model)),
        Provider::Anthropic => Box::new(AnthropicClient::new(api_key, model)),
        Provider::GoogleGemini => Box::new(GeminiClient::new(api_key, model)),
    })
}

fn resolve_api_key(
    provider: Provider,
    api_key: Option<&str>,
    config: &Config,
) -> Result<String, ProviderError> {
    if let Some(key) = api_key {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    config
        .api_key_for(provider)
        .map(|secret| secret.expose_secret().to_string())
        .ok_or_else(|| ProviderError::MissingApiKey {
            provider: provider.label().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_form_spellings() {
        assert_eq!(Provider::parse("Groq"), Some(Provider::Groq));
        assert_eq!(Provider::parse("claude"), Some(Provider::Anthropic));
        assert_eq!(Provider::parse("Google Gemini"), Some(Provider::GoogleGemini));
        assert_eq!(Provider::parse("gemini"), Some(Provider::GoogleGemini));
        assert_eq!(Provider::parse("llamafile"), None);
    }

    #[test]
    fn every_default_model_is_in_its_catalog() {
        for provider in Provider::all() {
            assert!(
                provider
                    .available_models()
                    .contains(&provider.default_model()),
                "default model for {} missing from catalog",
                provider
            );
        }
    }

    #[test]
    fn token_limit_falls_back_for_unknown_models() {
        assert_eq!(token_limit("claude-3-5-sonnet-20241022"), 200_000);
        assert_eq!(token_limit("some-unknown-model"), 8192);
    }

    #[test]
    fn resolve_api_key_prefers_request_key() {
        let config = Config::test_config();

        let key = resolve_api_key(Provider::Groq, Some("request_key"), &config)
            .expect("request key should win");
        assert_eq!(key, "request_key");

        let key = resolve_api_key(Provider::Groq, Some("   "), &config)
            .expect("blank request key should fall back to config");
        assert_eq!(key, "test_groq_key");

        let err = resolve_api_key(Provider::OpenAi, None, &config)
            .expect_err("missing key should error");
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    }
}

use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::providers::Provider;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    /// Root directory holding the H5P library asset folders
    /// (`H5P.MultiChoice-1.16`, `H5P.Blanks-1.14`, ...).
    pub library_root: PathBuf,
    /// Where generated packages and Markdown exports are written.
    pub output_dir: PathBuf,
    pub groq_api_key: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub google_api_key: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            library_root: env::var("LIBRARY_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("content_types")),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("h5p-forge")),
            groq_api_key: secret_from_env("GROQ_API_KEY"),
            openai_api_key: secret_from_env("OPENAI_API_KEY"),
            anthropic_api_key: secret_from_env("ANTHROPIC_API_KEY"),
            google_api_key: secret_from_env("GOOGLE_API_KEY"),
        }
    }

    /// The configured key for a provider, if one was supplied via environment.
    pub fn api_key_for(&self, provider: Provider) -> Option<&SecretString> {
        match provider {
            Provider::Groq => self.groq_api_key.as_ref(),
            Provider::OpenAi => self.openai_api_key.as_ref(),
            Provider::Anthropic => self.anthropic_api_key.as_ref(),
            Provider::GoogleGemini => self.google_api_key.as_ref(),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            library_root: PathBuf::from("content_types"),
            output_dir: env::temp_dir().join("h5p-forge-test"),
            groq_api_key: Some(SecretString::from("test_groq_key".to_string())),
            openai_api_key: None,
            anthropic_api_key: None,
            google_api_key: None,
        }
    }
}

fn secret_from_env(name: &str) -> Option<SecretString> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

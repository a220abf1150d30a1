use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Text fields of the generation form, collected from the multipart upload
/// alongside the PDF itself.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerationParams {
    #[validate(length(min = 1, max = 64))]
    pub provider: String,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub kind: String,

    #[validate(range(min = 1, max = 50))]
    pub question_count: Option<u8>,

    /// Leading prompt placed ahead of the generated instructions.
    #[validate(length(max = 10000))]
    pub prompt: Option<String>,

    /// Overrides the provider key from configuration for this request.
    pub api_key: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 2, max = 16))]
    pub language: Option<String>,
}

impl GenerationParams {
    pub fn question_count(&self) -> usize {
        self.question_count
            .map(usize::from)
            .unwrap_or(DEFAULT_QUESTION_COUNT)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }
}

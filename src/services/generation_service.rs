use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    constants::prompts,
    errors::{AppError, AppResult},
    models::{
        domain::content_item::ContentItem,
        domain::question::{NormalizedQuestion, QuestionKind, RejectedRecord},
        dto::request::GenerationParams,
    },
    providers::{self, Provider, ProviderClient},
    services::{assembler::PackageAssembler, extraction, mapper, markdown, normalizer},
};

/// Everything produced by one generation request. Artifact paths are absent
/// when every record was rejected; the caller decides what to do with a
/// partial or empty result.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub id: Uuid,
    pub title: String,
    pub kind: QuestionKind,
    pub provider: Provider,
    pub model: String,
    pub accepted: Vec<NormalizedQuestion>,
    pub rejected: Vec<RejectedRecord>,
    pub package_path: Option<PathBuf>,
    pub markdown_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

pub struct GenerationService {
    config: Arc<Config>,
    assembler: PackageAssembler,
}

impl GenerationService {
    pub fn new(config: Arc<Config>) -> Self {
        let assembler =
            PackageAssembler::new(config.library_root.clone(), config.output_dir.clone());
        Self { config, assembler }
    }

    /// Runs the whole pipeline for one request: extract, prompt, call the
    /// provider, normalize, and (when anything survived) package and export.
    pub async fn generate(
        &self,
        params: &GenerationParams,
        file_name: &str,
        pdf_bytes: &[u8],
    ) -> AppResult<GenerationOutcome> {
        params.validate()?;

        let provider = Provider::parse(&params.provider).ok_or_else(|| {
            AppError::ValidationError(format!("unsupported LLM provider: {}", params.provider))
        })?;
        let kind = QuestionKind::parse(&params.kind).ok_or_else(|| {
            AppError::ValidationError(format!("unsupported activity kind: {}", params.kind))
        })?;

        let model = params
            .model
            .as_deref()
            .unwrap_or_else(|| provider.default_model());
        if !provider.available_models().contains(&model) {
            return Err(AppError::ValidationError(format!(
                "model '{}' is not available for {}",
                model, provider
            )));
        }

        let client =
            providers::client_for(provider, params.api_key.as_deref(), Some(model), &self.config)?;

        let text = extraction::extract_text(pdf_bytes)?;

        self.generate_from_text(client.as_ref(), provider, model, kind, params, file_name, &text)
            .await
    }

    /// Pipeline from extracted document text on, with the provider seam
    /// injected. Split out so tests can drive it with a mock client.
    pub async fn generate_from_text(
        &self,
        client: &dyn ProviderClient,
        provider: Provider,
        model: &str,
        kind: QuestionKind,
        params: &GenerationParams,
        file_name: &str,
        text: &str,
    ) -> AppResult<GenerationOutcome> {
        let document = prompts::truncate_to_budget(text, model);
        if document.len() < text.len() {
            log::info!(
                "document truncated from {} to {} characters for model {}",
                text.len(),
                document.len(),
                model
            );
        }

        let count = params.question_count();
        let leading = params
            .prompt
            .as_deref()
            .unwrap_or(prompts::DEFAULT_LEADING_PROMPT);
        let prompt = prompts::build_prompt(kind, count, leading, document);

        log::info!(
            "requesting {} {} records from {} ({})",
            count,
            kind,
            provider,
            model
        );
        let raw = client.generate(&prompt).await?;

        let (accepted, rejected) = normalizer::normalize(&raw, kind);
        log::info!(
            "normalized provider response: {} accepted, {} rejected",
            accepted.len(),
            rejected.len()
        );

        let id = Uuid::new_v4();
        let title = params
            .title
            .clone()
            .unwrap_or_else(|| default_title(file_name));

        let mut outcome = GenerationOutcome {
            id,
            title,
            kind,
            provider,
            model: model.to_string(),
            accepted,
            rejected,
            package_path: None,
            markdown_path: None,
            created_at: Utc::now(),
        };

        if outcome.accepted.is_empty() {
            return Ok(outcome);
        }

        let items: Vec<ContentItem> = outcome.accepted.iter().map(mapper::map).collect();
        let libraries = mapper::required_libraries(&items);

        let package_path = self.config.output_dir.join(format!("{}.h5p", id));
        self.assembler.assemble(
            &outcome.title,
            params.language(),
            &items,
            &libraries,
            &package_path,
        )?;

        let markdown_path = self.config.output_dir.join(format!("{}.md", id));
        std::fs::write(&markdown_path, markdown::export(&outcome.accepted)).map_err(|err| {
            AppError::InternalError(format!("failed to write markdown export: {}", err))
        })?;

        outcome.package_path = Some(package_path);
        outcome.markdown_path = Some(markdown_path);
        Ok(outcome)
    }
}

fn default_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .filter(|stem| !stem.is_empty())
        .unwrap_or("document");
    format!("Course materials from {}", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProviderClient;
    use crate::test_utils::fixtures;

    fn params(kind: &str) -> GenerationParams {
        GenerationParams {
            provider: "groq".to_string(),
            model: None,
            kind: kind.to_string(),
            question_count: Some(2),
            prompt: None,
            api_key: None,
            title: None,
            language: None,
        }
    }

    #[test]
    fn default_title_uses_file_stem() {
        assert_eq!(
            default_title("biology-notes.pdf"),
            "Course materials from biology-notes"
        );
        assert_eq!(default_title(""), "Course materials from document");
    }

    #[actix_web::test]
    async fn pipeline_produces_package_and_markdown() {
        let harness = fixtures::service_harness();
        let service = GenerationService::new(harness.config.clone());

        let mut client = MockProviderClient::new();
        client.expect_generate().returning(|_| {
            Ok(r#"[
                {"question": "Sky color?", "options": ["Blue", "Red"], "correct": "Blue"},
                {"question": "Grass color?", "options": ["Green", "Red"], "correct": "Purple"}
            ]"#
            .to_string())
        });

        let outcome = service
            .generate_from_text(
                &client,
                Provider::Groq,
                "mistral-saba-24b",
                QuestionKind::MultipleChoice,
                &params("multiple_choice"),
                "notes.pdf",
                "The sky is blue. Grass is green.",
            )
            .await
            .expect("pipeline should succeed");

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.title, "Course materials from notes");

        let package_path = outcome.package_path.expect("package should exist");
        assert!(package_path.exists());
        let markdown_path = outcome.markdown_path.expect("markdown should exist");
        let rendered = std::fs::read_to_string(markdown_path).expect("markdown should read");
        assert!(rendered.contains("Sky color?"));
    }

    #[actix_web::test]
    async fn all_rejected_batch_skips_packaging() {
        let harness = fixtures::service_harness();
        let service = GenerationService::new(harness.config.clone());

        let mut client = MockProviderClient::new();
        client
            .expect_generate()
            .returning(|_| Ok("not json at all".to_string()));

        let outcome = service
            .generate_from_text(
                &client,
                Provider::Groq,
                "mistral-saba-24b",
                QuestionKind::MultipleChoice,
                &params("multiple_choice"),
                "notes.pdf",
                "The sky is blue.",
            )
            .await
            .expect("pipeline should still report");

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert!(outcome.package_path.is_none());
        assert!(outcome.markdown_path.is_none());
    }

    #[actix_web::test]
    async fn provider_failure_propagates() {
        let harness = fixtures::service_harness();
        let service = GenerationService::new(harness.config.clone());

        let mut client = MockProviderClient::new();
        client.expect_generate().returning(|_| {
            Err(crate::errors::ProviderError::RequestFailed {
                provider: "Groq".to_string(),
                message: "rate limited".to_string(),
            })
        });

        let err = service
            .generate_from_text(
                &client,
                Provider::Groq,
                "mistral-saba-24b",
                QuestionKind::MultipleChoice,
                &params("multiple_choice"),
                "notes.pdf",
                "The sky is blue.",
            )
            .await
            .expect_err("provider failure should propagate");

        assert!(matches!(err, AppError::ProviderError(_)));
    }
}

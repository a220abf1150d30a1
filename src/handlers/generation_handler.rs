use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::GenerationParams,
        response::{GenerationResponse, RejectionDto},
    },
    services::GenerationOutcome,
};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[post("/api/generations")]
pub async fn create_generation(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = read_form(payload).await?;
    let params = form.params()?;
    let (file_name, pdf_bytes) = form
        .file
        .ok_or_else(|| AppError::ValidationError("a PDF file upload is required".to_string()))?;

    let outcome = state
        .generation_service
        .generate(&params, &file_name, &pdf_bytes)
        .await?;
    state.register_artifacts(&outcome).await;

    let response = build_response(&outcome);
    if outcome.accepted.is_empty() {
        // nothing usable came back; surface the report without a package
        return Ok(HttpResponse::UnprocessableEntity().json(response));
    }
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/generations/{id}/package")]
pub async fn download_package(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let artifacts = state
        .artifacts_for(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Generation '{}' not found", id)))?;
    let path = artifacts
        .package_path
        .ok_or_else(|| AppError::NotFound(format!("Generation '{}' produced no package", id)))?;

    let bytes = std::fs::read(&path)
        .map_err(|err| AppError::InternalError(format!("failed to read package: {}", err)))?;

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}.h5p\"", artifacts.download_stem),
        ))
        .body(bytes))
}

#[get("/api/generations/{id}/markdown")]
pub async fn download_markdown(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let artifacts = state
        .artifacts_for(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Generation '{}' not found", id)))?;
    let path = artifacts
        .markdown_path
        .ok_or_else(|| AppError::NotFound(format!("Generation '{}' produced no export", id)))?;

    let text = std::fs::read_to_string(&path)
        .map_err(|err| AppError::InternalError(format!("failed to read export: {}", err)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename=\"{}_Questions.md\"",
                artifacts.download_stem
            ),
        ))
        .body(text))
}

fn build_response(outcome: &GenerationOutcome) -> GenerationResponse {
    GenerationResponse {
        id: outcome.id,
        title: outcome.title.clone(),
        kind: outcome.kind,
        provider: outcome.provider,
        model: outcome.model.clone(),
        accepted: outcome.accepted.len(),
        rejected: outcome.rejected.len(),
        rejections: outcome.rejected.iter().map(RejectionDto::from).collect(),
        package_url: outcome
            .package_path
            .as_ref()
            .map(|_| format!("/api/generations/{}/package", outcome.id)),
        markdown_url: outcome
            .markdown_path
            .as_ref()
            .map(|_| format!("/api/generations/{}/markdown", outcome.id)),
        created_at: outcome.created_at,
    }
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required_text(&self, key: &str) -> Result<String, AppError> {
        self.text(key)
            .ok_or_else(|| AppError::ValidationError(format!("field '{}' is required", key)))
    }

    fn params(&self) -> Result<GenerationParams, AppError> {
        let question_count = match self.text("question_count") {
            Some(raw) => Some(raw.parse::<u8>().map_err(|_| {
                AppError::ValidationError("question_count must be a number".to_string())
            })?),
            None => None,
        };

        Ok(GenerationParams {
            provider: self.required_text("provider")?,
            model: self.text("model"),
            kind: self.required_text("kind")?,
            question_count,
            prompt: self.text("prompt"),
            api_key: self.text("api_key"),
            title: self.text("title"),
            language: self.text("language"),
        })
    }
}

async fn read_form(mut payload: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| AppError::ValidationError(format!("invalid multipart payload: {}", err)))?
    {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| {
                AppError::ValidationError(format!("failed to read multipart field: {}", err))
            })?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::ValidationError(
                    "upload exceeds the size limit".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        if name == "file" {
            let file_name = file_name.unwrap_or_else(|| "document.pdf".to_string());
            form.file = Some((file_name, data));
        } else if !name.is_empty() {
            let value = String::from_utf8(data).map_err(|_| {
                AppError::ValidationError(format!("field '{}' is not valid UTF-8", name))
            })?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::{QuestionKind, RejectReason, RejectedRecord};
    use crate::providers::Provider;

    fn sample_form() -> UploadForm {
        let mut form = UploadForm::default();
        form.fields
            .insert("provider".to_string(), "groq".to_string());
        form.fields
            .insert("kind".to_string(), "multiple_choice".to_string());
        form
    }

    #[test]
    fn params_require_provider_and_kind() {
        let form = UploadForm::default();
        assert!(form.params().is_err());

        let form = sample_form();
        let params = form.params().expect("minimal form should parse");
        assert_eq!(params.provider, "groq");
        assert!(params.model.is_none());
    }

    #[test]
    fn params_reject_non_numeric_question_count() {
        let mut form = sample_form();
        form.fields
            .insert("question_count".to_string(), "many".to_string());
        assert!(form.params().is_err());

        form.fields
            .insert("question_count".to_string(), "7".to_string());
        let params = form.params().expect("numeric count should parse");
        assert_eq!(params.question_count, Some(7));
    }

    #[test]
    fn blank_fields_are_treated_as_absent() {
        let mut form = sample_form();
        form.fields.insert("model".to_string(), "   ".to_string());
        let params = form.params().expect("form should parse");
        assert!(params.model.is_none());
    }

    #[test]
    fn response_urls_follow_artifact_presence() {
        let outcome = GenerationOutcome {
            id: Uuid::new_v4(),
            title: "Title".to_string(),
            kind: QuestionKind::MultipleChoice,
            provider: Provider::Groq,
            model: "mistral-saba-24b".to_string(),
            accepted: Vec::new(),
            rejected: vec![RejectedRecord::new("junk", RejectReason::Unparseable)],
            package_path: None,
            markdown_path: None,
            created_at: chrono::Utc::now(),
        };

        let response = build_response(&outcome);
        assert_eq!(response.accepted, 0);
        assert_eq!(response.rejected, 1);
        assert!(response.package_url.is_none());
        assert!(response.markdown_url.is_none());
    }
}

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failure to turn an uploaded PDF into plain text.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("unable to read PDF: {0}")]
    Unreadable(String),

    #[error("no text could be extracted from the PDF")]
    NoText,
}

/// Failure while talking to an LLM provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("{provider} API key is required")]
    MissingApiKey { provider: String },

    #[error("{provider} request failed: {message}")]
    RequestFailed { provider: String, message: String },

    #[error("{provider} response content is empty")]
    EmptyResponse { provider: String },
}

/// Fatal failure during package assembly. The assembler guarantees that no
/// partial archive is left at the output path and no staging directory leaks
/// when one of these is returned.
#[derive(Debug, Clone, Error)]
pub enum PackageError {
    #[error("missing library assets: {0}")]
    MissingLibrary(String),

    #[error("failed to write package: {0}")]
    WriteFailure(String),
}

impl From<std::io::Error> for PackageError {
    fn from(err: std::io::Error) -> Self {
        PackageError::WriteFailure(err.to_string())
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(err: zip::result::ZipError) -> Self {
        PackageError::WriteFailure(err.to_string())
    }
}

impl From<serde_json::Error> for PackageError {
    fn from(err: serde_json::Error) -> Self {
        PackageError::WriteFailure(format!("serialization error: {}", err))
    }
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Packaging error: {0}")]
    PackageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ExtractionError(_) => "EXTRACTION_ERROR",
            AppError::ProviderError(_) => "PROVIDER_ERROR",
            AppError::PackageError(_) => "PACKAGE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ExtractionError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            AppError::PackageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("{} ({})", self, self.error_code());
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::ExtractionError(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<PackageError> for AppError {
    fn from(err: PackageError) -> Self {
        AppError::PackageError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

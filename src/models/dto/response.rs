use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::question::{QuestionKind, RejectReason, RejectedRecord};
use crate::providers::Provider;

/// Longest fragment echoed back in a rejection report. Full fragments stay in
/// the server log; responses carry enough to identify the offending record.
const MAX_FRAGMENT_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct RejectionDto {
    pub fragment: String,
    pub reason: RejectReason,
}

impl From<&RejectedRecord> for RejectionDto {
    fn from(record: &RejectedRecord) -> Self {
        RejectionDto {
            fragment: truncate_chars(&record.fragment, MAX_FRAGMENT_CHARS),
            reason: record.reason,
        }
    }
}

/// Report returned for every generation attempt: the caller sees both counts
/// and every rejection reason, and decides whether a partial result is
/// acceptable.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub id: Uuid,
    pub title: String,
    pub kind: QuestionKind,
    pub provider: Provider,
    pub model: String,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: Vec<RejectionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub context_window: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderCatalogEntry {
    pub provider: Provider,
    pub label: String,
    pub default_model: String,
    pub models: Vec<ModelInfo>,
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

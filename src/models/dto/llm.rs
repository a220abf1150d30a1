use schemars::JsonSchema;
use serde::Deserialize;

use crate::models::domain::question::QuestionKind;

/// Record shapes the model is asked to return, one per activity kind. The
/// derived JSON Schema is embedded in the prompt so the model sees the exact
/// contract; the normalizer still validates every element on the way back in.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawMultipleChoiceRecord {
    pub question: String,
    pub options: Vec<String>,
    /// Must be the exact text of one entry in `options`.
    pub correct: String,
    pub feedback_correct: Option<String>,
    pub feedback_incorrect: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawTrueFalseRecord {
    pub question: String,
    /// Strictly a JSON boolean, not the strings "true"/"false".
    pub correct: bool,
    pub feedback_correct: Option<String>,
    pub feedback_incorrect: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawFillBlankRecord {
    /// Sentence containing `____` where the answer belongs.
    pub text: String,
    pub answer: String,
    pub feedback_correct: Option<String>,
    pub feedback_incorrect: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawTextRecord {
    pub text: String,
}

/// Pretty-printed JSON Schema for the element shape of a kind, for embedding
/// in the prompt.
pub fn schema_json_for(kind: QuestionKind) -> String {
    let schema = match kind {
        QuestionKind::MultipleChoice => schemars::schema_for!(RawMultipleChoiceRecord),
        QuestionKind::TrueFalse => schemars::schema_for!(RawTrueFalseRecord),
        QuestionKind::FillBlank => schemars::schema_for!(RawFillBlankRecord),
        QuestionKind::Text => schemars::schema_for!(RawTextRecord),
    };

    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

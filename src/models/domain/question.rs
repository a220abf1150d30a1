use serde::{Deserialize, Serialize};

/// The four supported activity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    TrueFalse,
    MultipleChoice,
    FillBlank,
    Text,
}

impl QuestionKind {
    /// Parses the request-facing spelling of a kind. Accepts both the
    /// snake_case identifiers and the human labels used in form dropdowns.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "true_false" | "true/false" | "truefalse" => Some(QuestionKind::TrueFalse),
            "multiple_choice" | "multiple choice" => Some(QuestionKind::MultipleChoice),
            "fill_blank" | "fill in the blanks" | "fill_in_the_blanks" => {
                Some(QuestionKind::FillBlank)
            }
            "text" => Some(QuestionKind::Text),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "True/False",
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::FillBlank => "Fill in the Blanks",
            QuestionKind::Text => "Text",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::FillBlank => "fill_blank",
            QuestionKind::Text => "text",
        };
        write!(f, "{}", name)
    }
}

/// Kind-specific payload of a normalized question. One closed variant per
/// kind, so a true/false answer can only ever be a boolean and a
/// multiple-choice answer can only ever be option text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionBody {
    TrueFalse { correct: bool },
    MultipleChoice { options: Vec<String>, correct: String },
    FillBlank { answer: String },
    Text,
}

/// A validated question record, ready for mapping into H5P content.
///
/// Invariants (enforced by the normalizer, relied on by the mapper):
/// `prompt` is non-empty plain text; for multiple choice, `options` has at
/// least two entries and `correct` equals exactly one of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_correct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_incorrect: Option<String>,
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl NormalizedQuestion {
    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::TrueFalse { .. } => QuestionKind::TrueFalse,
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::FillBlank { .. } => QuestionKind::FillBlank,
            QuestionBody::Text => QuestionKind::Text,
        }
    }

    /// Option texts, empty for kinds without options.
    pub fn options(&self) -> &[String] {
        match &self.body {
            QuestionBody::MultipleChoice { options, .. } => options,
            _ => &[],
        }
    }
}

/// Why a record (or a whole response) was dropped during normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Unparseable,
    MissingPrompt,
    CorrectNotInOptions,
    InsufficientOptions,
    WrongType,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RejectReason::Unparseable => "unparseable",
            RejectReason::MissingPrompt => "missing_prompt",
            RejectReason::CorrectNotInOptions => "correct_not_in_options",
            RejectReason::InsufficientOptions => "insufficient_options",
            RejectReason::WrongType => "wrong_type",
        };
        write!(f, "{}", name)
    }
}

/// A dropped record together with the fragment it came from, surfaced to the
/// caller for manual inspection. Never thrown; always collected.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub fragment: String,
    pub reason: RejectReason,
}

impl RejectedRecord {
    pub fn new(fragment: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            fragment: fragment.into(),
            reason,
        }
    }
}

use serde::Serialize;

use super::library::LibraryRef;

/// The target-format payload for one question, one closed variant per
/// interaction type. Serialization of each variant matches the parameter
/// schema of the referenced H5P library.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentItem {
    MultiChoice(MultiChoiceParams),
    TrueFalse(TrueFalseParams),
    Blanks(BlanksParams),
    AdvancedText(AdvancedTextParams),
}

impl ContentItem {
    pub fn library(&self) -> LibraryRef {
        match self {
            ContentItem::MultiChoice(_) => LibraryRef::MULTI_CHOICE,
            ContentItem::TrueFalse(_) => LibraryRef::TRUE_FALSE,
            ContentItem::Blanks(_) => LibraryRef::BLANKS,
            ContentItem::AdvancedText(_) => LibraryRef::ADVANCED_TEXT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MultiChoiceParams {
    pub question: String,
    pub answers: Vec<MultiChoiceAnswer>,
    pub behaviour: QuestionBehaviour,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MultiChoiceAnswer {
    pub text: String,
    pub correct: bool,
    #[serde(rename = "tipsAndFeedback", skip_serializing_if = "Option::is_none")]
    pub tips_and_feedback: Option<AnswerFeedback>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnswerFeedback {
    #[serde(rename = "chosenFeedback")]
    pub chosen_feedback: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseParams {
    pub question: String,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_on_correct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_on_wrong: Option<String>,
    pub behaviour: QuestionBehaviour,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlanksParams {
    /// Stem with the expected answer inlined as `*answer*`.
    pub text: String,
    pub behaviour: QuestionBehaviour,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdvancedTextParams {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBehaviour {
    pub enable_retry: bool,
    pub enable_solutions_button: bool,
    pub show_solutions: bool,
}

impl Default for QuestionBehaviour {
    fn default() -> Self {
        Self {
            enable_retry: true,
            enable_solutions_button: true,
            show_solutions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_item_reports_its_library() {
        let item = ContentItem::AdvancedText(AdvancedTextParams {
            text: "<p>Key point</p>".to_string(),
        });
        assert_eq!(item.library(), LibraryRef::ADVANCED_TEXT);
    }

    #[test]
    fn multi_choice_serializes_h5p_shape() {
        let item = ContentItem::MultiChoice(MultiChoiceParams {
            question: "Sky color?".to_string(),
            answers: vec![
                MultiChoiceAnswer {
                    text: "Blue".to_string(),
                    correct: true,
                    tips_and_feedback: Some(AnswerFeedback {
                        chosen_feedback: "Right".to_string(),
                    }),
                },
                MultiChoiceAnswer {
                    text: "Red".to_string(),
                    correct: false,
                    tips_and_feedback: None,
                },
            ],
            behaviour: QuestionBehaviour::default(),
        });

        let json = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(json["question"], "Sky color?");
        assert_eq!(json["answers"][0]["correct"], true);
        assert_eq!(json["answers"][0]["tipsAndFeedback"]["chosenFeedback"], "Right");
        assert!(json["answers"][1].get("tipsAndFeedback").is_none());
        assert_eq!(json["behaviour"]["enableRetry"], true);
    }

    #[test]
    fn true_false_serializes_boolean_correct() {
        let item = ContentItem::TrueFalse(TrueFalseParams {
            question: "Water is wet".to_string(),
            correct: true,
            feedback_on_correct: None,
            feedback_on_wrong: None,
            behaviour: QuestionBehaviour::default(),
        });

        let json = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(json["correct"], serde_json::Value::Bool(true));
    }
}

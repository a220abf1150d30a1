//! Maps normalized question records onto H5P content payloads.

use std::collections::BTreeSet;

use crate::models::domain::content_item::{
    AdvancedTextParams, AnswerFeedback, BlanksParams, ContentItem, MultiChoiceAnswer,
    MultiChoiceParams, QuestionBehaviour, TrueFalseParams,
};
use crate::models::domain::library::LibraryRef;
use crate::models::domain::question::{NormalizedQuestion, QuestionBody};

/// Maps one record to its content payload. Total for every record the
/// normalizer accepts: the `QuestionBody` variants make an invalid
/// kind/answer combination unrepresentable.
pub fn map(question: &NormalizedQuestion) -> ContentItem {
    match &question.body {
        QuestionBody::MultipleChoice { options, correct } => {
            let answers = options
                .iter()
                .map(|option| {
                    let is_correct = option == correct;
                    let feedback = if is_correct {
                        question.feedback_correct.clone()
                    } else {
                        question.feedback_incorrect.clone()
                    };
                    MultiChoiceAnswer {
                        text: option.clone(),
                        correct: is_correct,
                        tips_and_feedback: feedback
                            .map(|chosen_feedback| AnswerFeedback { chosen_feedback }),
                    }
                })
                .collect();

            ContentItem::MultiChoice(MultiChoiceParams {
                question: question.prompt.clone(),
                answers,
                behaviour: QuestionBehaviour::default(),
            })
        }
        QuestionBody::TrueFalse { correct } => ContentItem::TrueFalse(TrueFalseParams {
            question: question.prompt.clone(),
            correct: *correct,
            feedback_on_correct: question.feedback_correct.clone(),
            feedback_on_wrong: question.feedback_incorrect.clone(),
            behaviour: QuestionBehaviour::default(),
        }),
        QuestionBody::FillBlank { answer } => ContentItem::Blanks(BlanksParams {
            text: question.prompt.replace("____", &format!("*{}*", answer)),
            behaviour: QuestionBehaviour::default(),
        }),
        QuestionBody::Text => ContentItem::AdvancedText(AdvancedTextParams {
            text: format!("<p>{}</p>", question.prompt),
        }),
    }
}

/// Libraries the package must carry for these items: each item's own library
/// plus the shared support libraries the question types depend on.
pub fn required_libraries(items: &[ContentItem]) -> BTreeSet<LibraryRef> {
    let mut libraries: BTreeSet<LibraryRef> = items.iter().map(ContentItem::library).collect();
    if !libraries.is_empty() {
        libraries.extend(LibraryRef::support_libraries());
    }
    libraries
}

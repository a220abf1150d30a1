//! Renders accepted records as a Markdown document for manual review,
//! independent of packaging.

use crate::models::domain::question::{NormalizedQuestion, QuestionBody, QuestionKind};

/// One section per question. An empty input yields just the heading.
pub fn export(items: &[NormalizedQuestion]) -> String {
    let heading = items
        .first()
        .map(|question| question.kind().label())
        .unwrap_or("Generated");

    let mut output = format!("# {} Questions and Answers\n\n", heading);
    for (index, question) in items.iter().enumerate() {
        render_section(&mut output, question, index + 1);
    }
    output
}

fn render_section(output: &mut String, question: &NormalizedQuestion, number: usize) {
    match &question.body {
        QuestionBody::MultipleChoice { options, correct } => {
            output.push_str(&format!("## Question {}: {}\n", number, question.prompt));
            output.push_str("Options:\n");
            for (position, option) in options.iter().enumerate() {
                let marker = if option == correct { "*" } else { "-" };
                output.push_str(&format!("  {} {}. {}\n", marker, position + 1, option));
            }
            output.push_str(&format!("**Correct Answer**: {}\n", correct));
        }
        QuestionBody::FillBlank { answer } => {
            output.push_str(&format!("## Sentence {}: {}\n", number, question.prompt));
            output.push_str(&format!("**Answer**: {}\n", answer));
        }
        QuestionBody::TrueFalse { correct } => {
            output.push_str(&format!("## Statement {}: {}\n", number, question.prompt));
            output.push_str(&format!(
                "**Answer**: {}\n",
                if *correct { "True" } else { "False" }
            ));
        }
        QuestionBody::Text => {
            output.push_str(&format!("## Slide {}: {}\n", number, question.prompt));
        }
    }

    if let Some(feedback) = &question.feedback_correct {
        output.push_str(&format!("**Feedback (correct)**: {}\n", feedback));
    }
    if let Some(feedback) = &question.feedback_incorrect {
        output.push_str(&format!("**Feedback (incorrect)**: {}\n", feedback));
    }
    output.push('\n');
}

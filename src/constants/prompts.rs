use crate::models::domain::question::QuestionKind;
use crate::models::dto::llm;
use crate::providers;

pub const DEFAULT_LEADING_PROMPT: &str =
    "Generate clear, concise questions based on the provided text.";

/// Rough character budget per context-window token, minus a reserve for the
/// instructions and the completion itself.
const CHARS_PER_TOKEN: usize = 4;
const PROMPT_RESERVE_TOKENS: usize = 2048;

/// Full prompt for one generation request: leading prompt, strict-JSON
/// instruction, kind-specific task description, the element schema, then the
/// document text.
pub fn build_prompt(
    kind: QuestionKind,
    count: usize,
    leading_prompt: &str,
    document_text: &str,
) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\nEach object must conform to this JSON Schema:\n{}\n\nText:\n{}",
        leading_prompt,
        strict_json_instruction(count),
        kind_instruction(kind, count),
        llm::schema_json_for(kind),
        document_text
    )
}

fn strict_json_instruction(count: usize) -> String {
    format!(
        "IMPORTANT: Your response MUST be ONLY the valid JSON list containing {} objects, \
         strictly formatted as requested. Do NOT include any other text, explanations, comments, \
         markdown formatting, or tags like <think> before or after the JSON data.",
        count
    )
}

fn kind_instruction(kind: QuestionKind, count: usize) -> String {
    match kind {
        QuestionKind::MultipleChoice => format!(
            "From the following text, generate {} multiple-choice questions, each with 4 options \
             and one correct answer. Return the result as a JSON list of objects with 'question', \
             'options', and 'correct' keys. Crucially, the value for the 'correct' key MUST be \
             the exact text of one of the strings provided in the 'options' list for that question.",
            count
        ),
        QuestionKind::FillBlank => format!(
            "From the following text, generate {} fill-in-the-blanks sentences, each with one \
             blank written as '____' and its answer. Return the result as a JSON list of objects \
             with 'text' and 'answer' keys.",
            count
        ),
        QuestionKind::TrueFalse => format!(
            "From the following text, generate {} true/false statements, each with a question \
             and a correct answer given as a JSON boolean. Return the result as a JSON list of \
             objects with 'question' and 'correct' keys.",
            count
        ),
        QuestionKind::Text => format!(
            "From the following text, generate {} concise text snippets for presentation slides, \
             each summarizing a key point. Return the result as a JSON list of objects with \
             'text' keys.",
            count
        ),
    }
}

/// Trims document text to fit the model's context window, leaving room for
/// instructions and the completion. Truncation policy beyond this guard is a
/// caller concern.
pub fn truncate_to_budget<'a>(text: &'a str, model: &str) -> &'a str {
    let budget_tokens = providers::token_limit(model).saturating_sub(PROMPT_RESERVE_TOKENS);
    let budget_chars = budget_tokens.saturating_mul(CHARS_PER_TOKEN);
    if text.len() <= budget_chars {
        return text;
    }

    let mut end = budget_chars;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_instruction_schema_and_text() {
        let prompt = build_prompt(
            QuestionKind::MultipleChoice,
            5,
            DEFAULT_LEADING_PROMPT,
            "Photosynthesis converts light into energy.",
        );

        assert!(prompt.starts_with(DEFAULT_LEADING_PROMPT));
        assert!(prompt.contains("JSON list containing 5 objects"));
        assert!(prompt.contains("'question', 'options', and 'correct' keys"));
        assert!(prompt.contains("JSON Schema"));
        assert!(prompt.ends_with("Photosynthesis converts light into energy."));
    }

    #[test]
    fn true_false_instruction_demands_boolean() {
        let prompt = build_prompt(QuestionKind::TrueFalse, 3, DEFAULT_LEADING_PROMPT, "text");
        assert!(prompt.contains("JSON boolean"));
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        let text = "short document";
        assert_eq!(truncate_to_budget(text, "gemma2-9b-it"), text);
    }

    #[test]
    fn truncate_cuts_long_text_to_model_budget() {
        // gemma2-9b-it: 8192 tokens, minus the reserve, times 4 chars
        let budget = (8192 - 2048) * 4;
        let text = "a".repeat(budget + 100);

        let truncated = truncate_to_budget(&text, "gemma2-9b-it");
        assert_eq!(truncated.len(), budget);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let budget = (8192 - 2048) * 4;
        let text = "é".repeat(budget);

        let truncated = truncate_to_budget(&text, "gemma2-9b-it");
        assert!(truncated.len() <= budget);
        assert!(text.is_char_boundary(truncated.len()));
    }
}

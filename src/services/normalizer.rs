//! Turns raw provider output into validated question records.
//!
//! Tolerates markdown code fences and minor JSON damage (trailing commas,
//! unterminated brackets); anything deeper is rejected rather than guessed
//! at. Rejections are collected per element and never abort the batch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::domain::question::{
    NormalizedQuestion, QuestionBody, QuestionKind, RejectReason, RejectedRecord,
};

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("HTML_TAG is a valid regex pattern"));

/// Validates a raw provider response against the invariants of
/// `expected_kind`. Returns the accepted records in input order and one
/// rejection per dropped element (or a single rejection covering the whole
/// response when it cannot be parsed as a JSON array at all).
pub fn normalize(
    raw: &str,
    expected_kind: QuestionKind,
) -> (Vec<NormalizedQuestion>, Vec<RejectedRecord>) {
    let stripped = strip_code_fences(raw);

    let parsed = match parse_with_repair(stripped) {
        Some(value) => value,
        None => {
            return (
                Vec::new(),
                vec![RejectedRecord::new(raw.trim(), RejectReason::Unparseable)],
            )
        }
    };

    let Value::Array(elements) = parsed else {
        return (
            Vec::new(),
            vec![RejectedRecord::new(raw.trim(), RejectReason::WrongType)],
        );
    };

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for element in &elements {
        match normalize_element(element, expected_kind) {
            Ok(question) => accepted.push(question),
            Err(reason) => rejected.push(RejectedRecord::new(element.to_string(), reason)),
        }
    }

    (accepted, rejected)
}

/// Removes a leading fence line (```) or (```json, any info string) and a
/// trailing ``` when both delimit the trimmed text. Fences elsewhere are left
/// for the JSON parser to reject.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };

    let body = rest[newline + 1..].trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

fn parse_with_repair(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let repaired = repair_json(text);
    serde_json::from_str(&repaired).ok()
}

/// Best-effort single-pass repair: drops commas left dangling before a
/// closer, closes an unterminated string, and appends closers for any
/// brackets still open at the end. Nothing else is guessed at.
fn repair_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.trim().chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' => {
                closers.push('}');
                out.push(ch);
            }
            '[' => {
                closers.push(']');
                out.push(ch);
            }
            '}' | ']' => {
                drop_trailing_comma(&mut out);
                closers.pop();
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    if in_string {
        out.push('"');
    }
    drop_trailing_comma(&mut out);
    while let Some(closer) = closers.pop() {
        out.push(closer);
    }

    out
}

fn drop_trailing_comma(out: &mut String) {
    out.truncate(out.trim_end().len());
    if out.ends_with(',') {
        out.pop();
    }
}

fn normalize_element(
    element: &Value,
    expected_kind: QuestionKind,
) -> Result<NormalizedQuestion, RejectReason> {
    let Value::Object(record) = element else {
        return Err(RejectReason::WrongType);
    };

    let feedback_correct = optional_text(record, "feedback_correct");
    let feedback_incorrect = optional_text(record, "feedback_incorrect");

    let (prompt, body) = match expected_kind {
        QuestionKind::MultipleChoice => {
            let prompt =
                first_text(record, &["question", "prompt"]).ok_or(RejectReason::MissingPrompt)?;

            let raw_options = record
                .get("options")
                .and_then(Value::as_array)
                .ok_or(RejectReason::WrongType)?;
            let mut options = Vec::with_capacity(raw_options.len());
            for option in raw_options {
                let Value::String(text) = option else {
                    return Err(RejectReason::WrongType);
                };
                options.push(strip_html(text));
            }
            if options.len() < 2 {
                return Err(RejectReason::InsufficientOptions);
            }

            let correct = record
                .get("correct")
                .and_then(Value::as_str)
                .map(strip_html)
                .ok_or(RejectReason::WrongType)?;
            if !options.iter().any(|option| option == &correct) {
                return Err(RejectReason::CorrectNotInOptions);
            }

            (prompt, QuestionBody::MultipleChoice { options, correct })
        }
        QuestionKind::TrueFalse => {
            let prompt =
                first_text(record, &["question", "prompt"]).ok_or(RejectReason::MissingPrompt)?;

            // strictly boolean, never the strings "true"/"false"
            let Some(Value::Bool(correct)) = record.get("correct") else {
                return Err(RejectReason::WrongType);
            };

            (prompt, QuestionBody::TrueFalse { correct: *correct })
        }
        QuestionKind::FillBlank => {
            let prompt =
                first_text(record, &["text", "prompt"]).ok_or(RejectReason::MissingPrompt)?;
            if !prompt.contains("____") {
                return Err(RejectReason::WrongType);
            }

            let answer = record
                .get("answer")
                .and_then(Value::as_str)
                .map(strip_html)
                .filter(|answer| !answer.is_empty())
                .ok_or(RejectReason::WrongType)?;

            (prompt, QuestionBody::FillBlank { answer })
        }
        QuestionKind::Text => {
            let prompt = first_text(record, &["text", "outline", "prompt"])
                .ok_or(RejectReason::MissingPrompt)?;

            (prompt, QuestionBody::Text)
        }
    };

    Ok(NormalizedQuestion {
        prompt,
        feedback_correct,
        feedback_incorrect,
        body,
    })
}

/// First non-empty string value among the candidate keys, HTML-stripped.
fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| optional_text(record, key))
}

fn optional_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(strip_html)
        .filter(|text| !text.is_empty())
}

fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").trim().to_string()
}

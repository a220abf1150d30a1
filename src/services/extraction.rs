//! PDF text extraction: bytes in, plain UTF-8 text out.

use crate::errors::ExtractionError;

/// Extracts all text from a PDF. Pages are separated by blank lines; a
/// document that parses but yields no text at all is an error, since there is
/// nothing to prompt with.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|err| ExtractionError::Unreadable(err.to_string()))?;

    let text = normalize_page_breaks(&text);
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    Ok(text)
}

/// pdf_extract separates pages with form feeds; prompts read better with
/// blank lines.
fn normalize_page_breaks(text: &str) -> String {
    text.replace('\x0c', "\n\n")
}

//! Output format selection.

use prompt_forge_core::OutputFormat;

/// Substrings that ask for XML output.
const XML_HINTS: &[&str] = &["xml", "<", "</"];

/// Substrings that ask for JSON output.
const JSON_HINTS: &[&str] = &["json", "{", "\""];

/// Prompts longer than this (in UTF-16 code units) default to XML.
pub const LONG_PROMPT_UNITS: usize = 350;

/// Prompts with at least this many non-empty lines default to XML.
pub const MULTILINE_THRESHOLD: usize = 4;

/// Choose the output format for a prompt.
///
/// First match wins: an XML hint, then a JSON hint, then length or line
/// count, otherwise JSON. XML hints take precedence over JSON hints.
pub fn select_format(prompt: &str) -> OutputFormat {
    let lower = prompt.to_lowercase();

    if XML_HINTS.iter().any(|hint| lower.contains(hint)) {
        return OutputFormat::Xml;
    }

    if JSON_HINTS.iter().any(|hint| lower.contains(hint)) {
        return OutputFormat::Json;
    }

    if prompt_length(prompt) > LONG_PROMPT_UNITS || non_empty_lines(prompt) >= MULTILINE_THRESHOLD {
        return OutputFormat::Xml;
    }

    OutputFormat::Json
}

/// Length in UTF-16 code units, so characters outside the BMP count twice.
fn prompt_length(prompt: &str) -> usize {
    prompt.encode_utf16().count()
}

/// Count lines split on `\n` / `\r\n`, ignoring empty ones.
fn non_empty_lines(prompt: &str) -> usize {
    prompt.lines().filter(|line| !line.is_empty()).count()
}

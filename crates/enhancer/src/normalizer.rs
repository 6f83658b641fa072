//! Normalization of model output into a schema-conformant document.
//!
//! Model output is untrusted free text. Whatever comes back, the result is
//! valid JSON or XML for the active schema: answers that do not match are
//! replaced by a document synthesized around the trimmed text. This never
//! fails and never surfaces an error to the caller.

use prompt_forge_core::OutputFormat;
use serde_json::Value;

use crate::schema::{EnhancementSchema, ModelOutput};

/// Normalized document plus whether it had to be synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOutput {
    /// The document text.
    pub output: String,
    /// `true` when the model answer was replaced by a fallback document.
    pub fallback: bool,
}

/// Normalize `raw` and return only the document text.
pub fn normalize(
    schema: &dyn EnhancementSchema,
    format: OutputFormat,
    raw: &str,
    original_prompt: &str,
) -> String {
    normalize_output(schema, format, raw, original_prompt).output
}

/// Normalize `raw` for `format` under `schema`.
pub fn normalize_output(
    schema: &dyn EnhancementSchema,
    format: OutputFormat,
    raw: &str,
    original_prompt: &str,
) -> NormalizedOutput {
    let trimmed = trim_answer(raw);

    let normalized = match format {
        OutputFormat::Json => normalize_json(schema, trimmed, original_prompt),
        OutputFormat::Xml => normalize_xml(schema, trimmed, original_prompt),
    };

    if normalized.fallback {
        tracing::debug!(
            schema = %schema.kind(),
            format = %format,
            raw_len = trimmed.len(),
            "Model output did not match schema, synthesized fallback document"
        );
    }

    normalized
}

/// Strip surrounding whitespace and byte order marks.
fn trim_answer(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn normalize_json(
    schema: &dyn EnhancementSchema,
    trimmed: &str,
    original_prompt: &str,
) -> NormalizedOutput {
    let parsed = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => schema.parse_json(&value, original_prompt),
        Err(_) => ModelOutput::Malformed,
    };

    match parsed {
        ModelOutput::Parsed(doc) => NormalizedOutput {
            output: doc.to_json_pretty(),
            fallback: false,
        },
        ModelOutput::Malformed => NormalizedOutput {
            output: schema.fallback(trimmed, original_prompt).to_json_pretty(),
            fallback: true,
        },
    }
}

fn normalize_xml(
    schema: &dyn EnhancementSchema,
    trimmed: &str,
    original_prompt: &str,
) -> NormalizedOutput {
    // Substring markers only; the document is not parsed.
    let looks_like_xml = trimmed.starts_with('<')
        && schema
            .required_xml_tags()
            .iter()
            .all(|tag| trimmed.contains(tag));

    if looks_like_xml {
        return NormalizedOutput {
            output: trimmed.to_string(),
            fallback: false,
        };
    }

    NormalizedOutput {
        output: schema.fallback(trimmed, original_prompt).to_xml(),
        fallback: true,
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Enhancement Types
// =============================================================================

/// Output format requested from the upstream model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which enhanced-document schema the process speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// `{ enhanced_prompt }`, tuned for video generation prompts.
    #[default]
    Video,
    /// `{ original_prompt, enhanced_prompt, structure[], key_improvements[] }`.
    General,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::General => "general",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single enhancement call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementRequest {
    /// Prompt to enhance, passed to the model verbatim.
    pub prompt: String,
    /// Upstream model identifier.
    #[serde(rename = "modelId")]
    pub model_id: String,
}

impl EnhancementRequest {
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
        }
    }
}

/// Result of a successful enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResponse {
    /// Format the output is encoded in.
    pub format: OutputFormat,
    /// The enhanced document.
    pub output: String,
    /// Whether the document was synthesized because the model output did not
    /// match the schema.
    #[serde(skip)]
    pub fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_wire_names() {
        assert_eq!(serde_json::to_value(OutputFormat::Json).unwrap(), "json");
        assert_eq!(serde_json::to_value(OutputFormat::Xml).unwrap(), "xml");
        assert_eq!(OutputFormat::Xml.to_string(), "xml");
    }

    #[test]
    fn test_schema_kind_serde() {
        let kind: SchemaKind = serde_json::from_value(serde_json::json!("general")).unwrap();
        assert_eq!(kind, SchemaKind::General);
        assert!(serde_json::from_value::<SchemaKind>(serde_json::json!("yaml")).is_err());
        assert_eq!(SchemaKind::default(), SchemaKind::Video);
    }

    #[test]
    fn test_response_hides_fallback_flag() {
        let response = EnhancementResponse {
            format: OutputFormat::Json,
            output: "{}".to_string(),
            fallback: true,
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value, serde_json::json!({ "format": "json", "output": "{}" }));
    }
}

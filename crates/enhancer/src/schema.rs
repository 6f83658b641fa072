//! Enhanced-document schema strategies.
//!
//! A schema owns everything that depends on the document shape: the persona
//! and response format advertised to the model, the XML markers the
//! normalizer looks for, and how a parsed JSON value becomes a document.
//! Instruction and normalizer always receive the same strategy, so the
//! advertised shape and the validated shape cannot drift apart.

use std::sync::Arc;

use prompt_forge_core::{OutputFormat, SchemaKind};
use serde_json::{json, Value};

/// Strategy for one enhanced-document shape.
pub trait EnhancementSchema: Send + Sync {
    /// Configuration name of the schema.
    fn kind(&self) -> SchemaKind;

    /// Persona and enhancement guideline lines, in order.
    fn preamble(&self) -> &'static [&'static str];

    /// Literal response-format block for `format`.
    fn response_format(&self, format: OutputFormat) -> &'static str;

    /// Tag markers an XML answer must contain to be passed through.
    fn required_xml_tags(&self) -> &'static [&'static str];

    /// Classify a parsed JSON answer.
    fn parse_json(&self, value: &Value, original_prompt: &str) -> ModelOutput;

    /// Document synthesized around free text.
    fn fallback(&self, text: &str, original_prompt: &str) -> EnhancedDocument;
}

/// Select the strategy for a configured schema.
pub fn schema_for(kind: SchemaKind) -> Arc<dyn EnhancementSchema> {
    match kind {
        SchemaKind::Video => Arc::new(VideoSchema),
        SchemaKind::General => Arc::new(GeneralSchema),
    }
}

/// Classified model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    /// The answer matched the schema.
    Parsed(EnhancedDocument),
    /// The answer did not match; the caller falls back.
    Malformed,
}

// =============================================================================
// Documents
// =============================================================================

/// A schema-conformant document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancedDocument {
    Video {
        enhanced_prompt: String,
    },
    General {
        original_prompt: String,
        enhanced_prompt: String,
        structure: Vec<String>,
        key_improvements: Vec<String>,
    },
}

impl EnhancedDocument {
    pub fn enhanced_prompt(&self) -> &str {
        match self {
            Self::Video { enhanced_prompt } | Self::General { enhanced_prompt, .. } => {
                enhanced_prompt
            }
        }
    }

    /// JSON value with fields in schema order.
    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Video { enhanced_prompt } => json!({
                "enhanced_prompt": enhanced_prompt,
            }),
            Self::General {
                original_prompt,
                enhanced_prompt,
                structure,
                key_improvements,
            } => json!({
                "original_prompt": original_prompt,
                "enhanced_prompt": enhanced_prompt,
                "structure": structure,
                "key_improvements": key_improvements,
            }),
        }
    }

    /// JSON text pretty-printed with 2-space indentation.
    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_json_value())
    }

    /// XML text with every value wrapped in CDATA.
    pub fn to_xml(&self) -> String {
        match self {
            Self::Video { enhanced_prompt } => {
                format!("<enhanced_prompt>{}</enhanced_prompt>", cdata(enhanced_prompt))
            }
            Self::General {
                original_prompt,
                enhanced_prompt,
                structure,
                key_improvements,
            } => [
                "<prompt_enhancement>".to_string(),
                format!("  <original_prompt>{}</original_prompt>", cdata(original_prompt)),
                format!("  <enhanced_prompt>{}</enhanced_prompt>", cdata(enhanced_prompt)),
                xml_list("structure", "section", structure),
                xml_list("key_improvements", "improvement", key_improvements),
                "</prompt_enhancement>".to_string(),
            ]
            .join("\n"),
        }
    }
}

/// Wrap text in a CDATA section.
///
/// Each `]]>` inside the text closes the current section after `]]` and
/// opens a new one starting with `>`, so the text survives unchanged.
pub fn cdata(value: &str) -> String {
    format!("<![CDATA[{}]]>", value.replace("]]>", "]]]]><![CDATA[>"))
}

fn xml_list(tag: &str, item_tag: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("  <{tag}></{tag}>");
    }
    let mut out = format!("  <{tag}>\n");
    for item in items {
        out.push_str(&format!("    <{item_tag}>{}</{item_tag}>\n", cdata(item)));
    }
    out.push_str(&format!("  </{tag}>"));
    out
}

/// Keep only the string elements of a JSON array.
fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

// =============================================================================
// Video Schema
// =============================================================================

const VIDEO_PREAMBLE: &[&str] = &[
    "You are an expert video generation prompt engineer with 30+ years of experience in filmmaking and visual storytelling.",
    "Your task is to enhance user prompts into comprehensive, professional video generation prompts ready for use with platforms like RunwayML, Midjourney, Pika Labs, or similar video generation tools.",
    "",
    "Video Enhancement Guidelines:",
    "",
    "[Scene Setup]",
    "- Describe the setting, environment, and visual atmosphere in detail",
    "- Include cinematography specifics (wide shot, close-up, medium shot, etc.)",
    "- Specify visual style (realistic, animated, cinematic, documentary style, etc.)",
    "",
    "[Camera Work]",
    "- Detail camera movements (pan left/right, tilt up/down, zoom in/out, tracking shots, dolly moves)",
    "- Specify camera angles (eye level, low angle, high angle, bird's eye, worm's eye)",
    "- Include camera techniques (handheld, steady, gimbal, drone shots)",
    "",
    "[Lighting & Color]",
    "- Specify lighting conditions (golden hour, blue hour, natural light, studio lighting, neon, dramatic shadows)",
    "- Include color grading hints (warm tones, cool tones, high contrast, desaturated, vibrant)",
    "- Detail mood and atmosphere through lighting",
    "",
    "[Duration & Pacing]",
    "- Suggest optimal timing for scenes (slow motion, real time, time-lapse)",
    "- Include pacing instructions (quick cuts, long takes, gradual build-up)",
    "- Specify transitions between scenes if applicable",
    "",
    "[Characters & Movement]",
    "- Describe character actions, expressions, and interactions",
    "- Include specific gestures, facial expressions, and body language",
    "- Detail any special effects or character animations",
    "",
    "[Audio & Sound Design]",
    "- Suggest background music style or genre",
    "- Include ambient sounds, dialogue requirements, or sound effects",
    "- Specify audio mood and intensity",
    "",
    "[Visual Effects & Styling]",
    "- Include particle effects, environmental effects, or special visual elements",
    "- Specify visual filters, effects, or post-processing hints",
    "- Detail any unique visual aesthetics or artistic styles",
    "",
    "[Output Quality & Technical]",
    "- Suggest resolution and aspect ratio preferences",
    "- Include quality expectations (cinematic quality, broadcast quality, etc.)",
    "- Specify render style preferences when relevant",
    "",
    "Example Structure:",
    "[Scene Setup] → [Camera Work] → [Lighting] → [Duration] → [Audio] → [Effects] → [Output Quality]",
];

const VIDEO_JSON_FORMAT: &str = r#"Return ONLY a single valid JSON object (no markdown, no code fences) with exactly this structure:

{
  "enhanced_prompt": string
}

Rule:
- "enhanced_prompt" must be a comprehensive, ready-to-use video generation prompt with clear video-specific sections."#;

const VIDEO_XML_FORMAT: &str = r#"Return ONLY a single XML document (no markdown, no code fences) with this structure:

<enhanced_prompt>
  <!-- comprehensive video generation prompt here -->
</enhanced_prompt>

Rule:
- Put the enhanced prompt inside CDATA."#;

/// `{ enhanced_prompt }` documents for video generation prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoSchema;

impl EnhancementSchema for VideoSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Video
    }

    fn preamble(&self) -> &'static [&'static str] {
        VIDEO_PREAMBLE
    }

    fn response_format(&self, format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => VIDEO_JSON_FORMAT,
            OutputFormat::Xml => VIDEO_XML_FORMAT,
        }
    }

    fn required_xml_tags(&self) -> &'static [&'static str] {
        &["<enhanced_prompt"]
    }

    fn parse_json(&self, value: &Value, _original_prompt: &str) -> ModelOutput {
        match value.get("enhanced_prompt").and_then(Value::as_str) {
            Some(enhanced_prompt) => ModelOutput::Parsed(EnhancedDocument::Video {
                enhanced_prompt: enhanced_prompt.to_string(),
            }),
            None => ModelOutput::Malformed,
        }
    }

    fn fallback(&self, text: &str, _original_prompt: &str) -> EnhancedDocument {
        EnhancedDocument::Video {
            enhanced_prompt: text.to_string(),
        }
    }
}

// =============================================================================
// General Schema
// =============================================================================

const GENERAL_PREAMBLE: &[&str] = &[
    "You are an expert prompt engineer who turns short, loosely worded requests into precise, well-structured prompts for large language models.",
    "Your task is to enhance the user's prompt while preserving its original intent, language, and any hard constraints it states.",
    "",
    "Enhancement Guidelines:",
    "",
    "[Intent]",
    "- State the goal of the prompt in one clear sentence",
    "- Name the intended audience and the expected deliverable",
    "",
    "[Context]",
    "- Add the background the model needs to answer well",
    "- Make implicit assumptions explicit",
    "",
    "[Constraints]",
    "- Specify length, tone, style, and format requirements",
    "- List anything the answer must include or avoid",
    "",
    "[Structure]",
    "- Break the prompt into clearly labelled sections",
    "- Order the sections the way the model should work through them",
    "",
    "[Quality]",
    "- Add success criteria the answer can be checked against",
    "- Ask for examples or step-by-step reasoning where it helps",
];

const GENERAL_JSON_FORMAT: &str = r#"Return ONLY a single valid JSON object (no markdown, no code fences) with exactly this structure:

{
  "original_prompt": string,
  "enhanced_prompt": string,
  "structure": string[],
  "key_improvements": string[]
}

Rules:
- "original_prompt" must repeat the user's prompt verbatim.
- "enhanced_prompt" must be the complete, ready-to-use enhanced prompt.
- "structure" lists the section names of the enhanced prompt, in order, as strings.
- "key_improvements" lists the concrete improvements you made, as strings."#;

const GENERAL_XML_FORMAT: &str = r#"Return ONLY a single XML document (no markdown, no code fences) with this structure:

<prompt_enhancement>
  <original_prompt><![CDATA[the user's prompt, verbatim]]></original_prompt>
  <enhanced_prompt><![CDATA[the complete enhanced prompt]]></enhanced_prompt>
  <structure>
    <section><![CDATA[section name]]></section>
  </structure>
  <key_improvements>
    <improvement><![CDATA[improvement made]]></improvement>
  </key_improvements>
</prompt_enhancement>

Rules:
- Put every text value inside CDATA.
- Repeat <section> and <improvement> once per entry."#;

/// `{ original_prompt, enhanced_prompt, structure[], key_improvements[] }`
/// documents for general-purpose prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralSchema;

impl EnhancementSchema for GeneralSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::General
    }

    fn preamble(&self) -> &'static [&'static str] {
        GENERAL_PREAMBLE
    }

    fn response_format(&self, format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => GENERAL_JSON_FORMAT,
            OutputFormat::Xml => GENERAL_XML_FORMAT,
        }
    }

    fn required_xml_tags(&self) -> &'static [&'static str] {
        &[
            "<prompt_enhancement",
            "<original_prompt",
            "<enhanced_prompt",
            "<structure",
            "<key_improvements",
        ]
    }

    fn parse_json(&self, value: &Value, original_prompt: &str) -> ModelOutput {
        let enhanced_prompt = value.get("enhanced_prompt").and_then(Value::as_str);
        let structure = value.get("structure").and_then(Value::as_array);
        let key_improvements = value.get("key_improvements").and_then(Value::as_array);

        let (Some(enhanced_prompt), Some(structure), Some(key_improvements)) =
            (enhanced_prompt, structure, key_improvements)
        else {
            return ModelOutput::Malformed;
        };

        let original_prompt = value
            .get("original_prompt")
            .and_then(Value::as_str)
            .unwrap_or(original_prompt);

        ModelOutput::Parsed(EnhancedDocument::General {
            original_prompt: original_prompt.to_string(),
            enhanced_prompt: enhanced_prompt.to_string(),
            structure: string_items(structure),
            key_improvements: string_items(key_improvements),
        })
    }

    fn fallback(&self, text: &str, original_prompt: &str) -> EnhancedDocument {
        EnhancedDocument::General {
            original_prompt: original_prompt.to_string(),
            enhanced_prompt: text.to_string(),
            structure: Vec::new(),
            key_improvements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_kind() {
        assert_eq!(schema_for(SchemaKind::Video).kind(), SchemaKind::Video);
        assert_eq!(schema_for(SchemaKind::General).kind(), SchemaKind::General);
    }

    #[test]
    fn test_cdata_escapes_terminator() {
        assert_eq!(cdata("plain"), "<![CDATA[plain]]>");
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn test_video_json_field_order() {
        let doc = VideoSchema.fallback("text", "ignored");
        assert_eq!(doc.to_json_pretty(), "{\n  \"enhanced_prompt\": \"text\"\n}");
    }

    #[test]
    fn test_general_json_field_order() {
        let doc = GeneralSchema.fallback("better", "orig");
        assert_eq!(
            doc.to_json_pretty(),
            "{\n  \"original_prompt\": \"orig\",\n  \"enhanced_prompt\": \"better\",\n  \"structure\": [],\n  \"key_improvements\": []\n}"
        );
    }

    #[test]
    fn test_general_parse_filters_non_strings() {
        let value = json!({
            "original_prompt": "orig",
            "enhanced_prompt": "better",
            "structure": ["Intent", 3, null, "Context", {"x": 1}],
            "key_improvements": [true, "Added constraints"],
            "extra": "dropped"
        });

        let ModelOutput::Parsed(doc) = GeneralSchema.parse_json(&value, "caller prompt") else {
            panic!("expected Parsed");
        };
        assert_eq!(
            doc,
            EnhancedDocument::General {
                original_prompt: "orig".into(),
                enhanced_prompt: "better".into(),
                structure: vec!["Intent".into(), "Context".into()],
                key_improvements: vec!["Added constraints".into()],
            }
        );
    }

    #[test]
    fn test_general_parse_defaults_original_prompt() {
        let value = json!({
            "enhanced_prompt": "better",
            "structure": [],
            "key_improvements": []
        });
        let ModelOutput::Parsed(doc) = GeneralSchema.parse_json(&value, "caller prompt") else {
            panic!("expected Parsed");
        };
        assert!(matches!(
            doc,
            EnhancedDocument::General { ref original_prompt, .. } if original_prompt == "caller prompt"
        ));
    }

    #[test]
    fn test_general_parse_requires_arrays() {
        let value = json!({
            "enhanced_prompt": "better",
            "structure": "not an array",
            "key_improvements": []
        });
        assert_eq!(GeneralSchema.parse_json(&value, "p"), ModelOutput::Malformed);

        let value = json!({ "enhanced_prompt": "better", "structure": [] });
        assert_eq!(GeneralSchema.parse_json(&value, "p"), ModelOutput::Malformed);
    }

    #[test]
    fn test_video_parse_requires_string() {
        assert_eq!(
            VideoSchema.parse_json(&json!({ "enhanced_prompt": 42 }), "p"),
            ModelOutput::Malformed
        );
        assert_eq!(VideoSchema.parse_json(&json!(["x"]), "p"), ModelOutput::Malformed);
        assert_eq!(VideoSchema.parse_json(&json!("x"), "p"), ModelOutput::Malformed);
    }

    #[test]
    fn test_general_xml_lists() {
        let doc = EnhancedDocument::General {
            original_prompt: "o".into(),
            enhanced_prompt: "e".into(),
            structure: vec!["Intent".into()],
            key_improvements: Vec::new(),
        };
        let xml = doc.to_xml();
        assert!(xml.contains("  <structure>\n    <section><![CDATA[Intent]]></section>\n  </structure>"));
        assert!(xml.contains("  <key_improvements></key_improvements>"));
    }

    #[test]
    fn test_advertised_xml_format_names_required_tags() {
        for schema in [schema_for(SchemaKind::Video), schema_for(SchemaKind::General)] {
            let advertised = schema.response_format(OutputFormat::Xml);
            for tag in schema.required_xml_tags() {
                assert!(advertised.contains(tag), "{} missing from {} format", tag, schema.kind());
            }
            assert!(advertised.contains("CDATA"));
        }
    }

    #[test]
    fn test_advertised_json_format_names_document_fields() {
        for schema in [schema_for(SchemaKind::Video), schema_for(SchemaKind::General)] {
            let advertised = schema.response_format(OutputFormat::Json);
            let doc = schema.fallback("x", "y").to_json_value();
            for key in doc.as_object().unwrap().keys() {
                assert!(advertised.contains(&format!("\"{}\"", key)));
            }
        }
    }
}

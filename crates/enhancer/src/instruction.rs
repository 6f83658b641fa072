//! System and user message construction.

use prompt_forge_core::OutputFormat;

use crate::schema::EnhancementSchema;

const USER_MESSAGE_LEAD: &str = "Enhance the following prompt:";
const USER_MESSAGE_REMINDER: &str =
    "Remember: return ONLY the requested JSON or XML, matching the schema exactly.";

/// Build the system instruction for a schema and output format.
pub fn build_system_prompt(schema: &dyn EnhancementSchema, format: OutputFormat) -> String {
    let mut lines: Vec<&str> = schema.preamble().to_vec();
    lines.push("");
    lines.push(schema.response_format(format));
    lines.join("\n")
}

/// Build the user turn wrapping the raw prompt.
pub fn build_user_message(prompt: &str) -> String {
    [USER_MESSAGE_LEAD, "", prompt, "", USER_MESSAGE_REMINDER].join("\n")
}

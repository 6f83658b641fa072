//! Enhancement orchestration.

use std::sync::Arc;

use prompt_forge_core::{
    config::EnhancerConfig,
    traits::CompletionClient,
    types::{ChatCompletionRequest, ChatMessage, EnhancementRequest, EnhancementResponse},
    Error, Result,
};

use crate::format::select_format;
use crate::instruction::{build_system_prompt, build_user_message};
use crate::normalizer::normalize_output;
use crate::schema::EnhancementSchema;

/// Sampling settings sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 1200,
        }
    }
}

impl From<&EnhancerConfig> for CompletionSettings {
    fn from(config: &EnhancerConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Runs one enhancement: validate, pick a format, ask the model, normalize.
///
/// Stateless apart from its immutable collaborators, so a single instance is
/// shared by every request.
pub struct EnhancementService {
    client: Arc<dyn CompletionClient>,
    schema: Arc<dyn EnhancementSchema>,
    settings: CompletionSettings,
}

impl EnhancementService {
    /// Create a service with default completion settings.
    pub fn new(client: Arc<dyn CompletionClient>, schema: Arc<dyn EnhancementSchema>) -> Self {
        Self {
            client,
            schema,
            settings: CompletionSettings::default(),
        }
    }

    /// Override the completion settings.
    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enhance a prompt.
    ///
    /// Blank prompt or model id fail with `InvalidInput` before the upstream
    /// is contacted. Upstream failures are returned as-is; malformed model
    /// output is absorbed by normalization.
    pub async fn enhance(&self, request: EnhancementRequest) -> Result<EnhancementResponse> {
        if request.prompt.trim().is_empty() {
            return Err(Error::invalid_input("Prompt is required."));
        }

        if request.model_id.trim().is_empty() {
            return Err(Error::invalid_input(
                "Model ID is required. Please select a model.",
            ));
        }

        let format = select_format(&request.prompt);

        tracing::debug!(
            model = %request.model_id,
            format = %format,
            schema = %self.schema.kind(),
            prompt_len = request.prompt.len(),
            "Selected output format"
        );

        let completion_request = ChatCompletionRequest::new(
            request.model_id.clone(),
            vec![
                ChatMessage::system(build_system_prompt(self.schema.as_ref(), format)),
                ChatMessage::user(build_user_message(&request.prompt)),
            ],
        )
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens);

        let completion = match self.client.create_chat_completion(&completion_request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(model = %request.model_id, error = %e, "Upstream completion failed");
                return Err(e);
            }
        };

        let normalized = normalize_output(self.schema.as_ref(), format, &completion, &request.prompt);

        tracing::info!(
            model = %request.model_id,
            format = %format,
            fallback = normalized.fallback,
            output_len = normalized.output.len(),
            "Prompt enhanced"
        );

        Ok(EnhancementResponse {
            format,
            output: normalized.output,
            fallback: normalized.fallback,
        })
    }
}

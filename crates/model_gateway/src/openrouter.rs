//! OpenRouter HTTP client.
//!
//! Implements both upstream traits over one `reqwest::Client`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use prompt_forge_core::{
    config::ModelGatewayConfig,
    traits::{CompletionClient, ModelCatalog},
    types::{ChatCompletionRequest, ModelDescriptor},
    Error, Result,
};

const USER_AGENT: &str = concat!("prompt-forge/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawChatResponse {
    #[serde(default)]
    choices: Option<Vec<RawChoice>>,
    #[serde(default)]
    error: Option<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawModelList {
    #[serde(default)]
    data: Vec<ModelDescriptor>,
}

// =============================================================================
// Client
// =============================================================================

/// Async client for the OpenRouter chat completions and models APIs.
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Build a client from the gateway configuration.
    pub fn new(config: &ModelGatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("OPENROUTER_API_KEY is not set, upstream requests will be sent unauthenticated");
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title);

        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a success response.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String> {
        let response = self
            .with_headers(builder)
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("OpenRouter request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::upstream_unavailable(format!("OpenRouter request failed: {}", e))
        })?;

        if !status.is_success() {
            return Err(Error::upstream_unavailable(format!(
                "OpenRouter API error: {}: {}",
                status, text
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn create_chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            temperature = ?request.temperature,
            max_tokens = ?request.max_tokens,
            "OpenRouter chat completion request"
        );

        let start = Instant::now();
        let text = self
            .send(self.http.post(self.endpoint("chat/completions")).json(request))
            .await?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = text.len(),
            "OpenRouter chat completion response"
        );

        parse_completion(&text)
    }
}

#[async_trait]
impl ModelCatalog for OpenRouterClient {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let text = self.send(self.http.get(self.endpoint("models"))).await?;

        let list: RawModelList = serde_json::from_str(&text).map_err(|e| {
            Error::upstream_malformed(format!("OpenRouter models response was not valid: {}", e))
        })?;

        tracing::debug!(count = list.data.len(), "Fetched OpenRouter model catalog");
        Ok(list.data)
    }
}

/// Extract the first choice's text from a success body.
fn parse_completion(text: &str) -> Result<String> {
    let parsed: RawChatResponse = serde_json::from_str(text).map_err(|e| {
        Error::upstream_malformed(format!("OpenRouter response was not valid JSON: {}", e))
    })?;

    if let Some(err) = parsed.error {
        return Err(Error::upstream_unavailable(format!(
            "OpenRouter API error: {}",
            err.message
        )));
    }

    let choice = parsed
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or_else(|| Error::upstream_malformed("OpenRouter response contained no choices"))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(Error::upstream_malformed(
            "OpenRouter returned an empty completion",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ModelGatewayConfig {
        ModelGatewayConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = OpenRouterClient::new(&config("https://openrouter.ai/api/v1/")).unwrap();
        assert_eq!(client.base_url(), "https://openrouter.ai/api/v1");
        assert_eq!(
            client.endpoint("chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(client.endpoint("/models"), "https://openrouter.ai/api/v1/models");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let mut cfg = config("http://localhost");
        cfg.api_key = Some(Secret::new("   ".to_string()));
        let client = OpenRouterClient::new(&cfg).unwrap();
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_parse_completion_variants() {
        let ok = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        assert_eq!(parse_completion(ok).unwrap(), "hello");

        let err = parse_completion(r#"{"error":{"message":"rate limited","code":429}}"#).unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(ref m) if m == "OpenRouter API error: rate limited"));

        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));

        let err = parse_completion(r#"{"choices":[{"message":{"content":"  \n"}}]}"#).unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));

        let err = parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));

        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));
    }
}

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use crate::types::SchemaKind;

/// Environment variable selecting the `config/<env>` overlay.
pub const ENV_SELECTOR: &str = "PROMPT_FORGE_ENV";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub model_gateway: ModelGatewayConfig,
    pub enhancer: EnhancerConfig,
    pub governance: GovernanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub enable_cors: bool,
    pub enable_tracing: bool,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Landing page password. Without one, nobody can log in.
    pub password: Option<Secret<String>>,
    pub cookie_name: String,
    /// Static cookie value. Derived from the password when unset.
    pub cookie_value: Option<Secret<String>>,
    pub cookie_max_age_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelGatewayConfig {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    pub referer: String,
    /// Sent as `X-Title` for OpenRouter attribution.
    pub title: String,
    pub request_timeout_secs: u64,
    /// Catalog cache lifetime; `0` disables caching.
    pub catalog_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnhancerConfig {
    pub schema: SchemaKind,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GovernanceConfig {
    pub json_logs: bool,
    pub enable_metrics: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__SERVER__PORT=3000 to server.port
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_override_option("model_gateway.api_key", std::env::var("OPENROUTER_API_KEY").ok())?
            .set_override_option("auth.password", std::env::var("LANDING_PASSWORD").ok())?
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rest of the system cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.cookie_name.trim().is_empty() {
            return Err(ConfigError::Message("auth.cookie_name must not be empty".into()));
        }
        if self.model_gateway.base_url.trim().is_empty() {
            return Err(ConfigError::Message("model_gateway.base_url must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.enhancer.temperature) {
            return Err(ConfigError::Message(format!(
                "enhancer.temperature must be between 0 and 2, got {}",
                self.enhancer.temperature
            )));
        }
        if self.enhancer.max_tokens == 0 {
            return Err(ConfigError::Message("enhancer.max_tokens must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
            allowed_origins: vec!["*".into()],
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: None,
            cookie_name: "prompt_forge_auth".into(),
            cookie_value: None,
            cookie_max_age_secs: 60 * 60 * 24, // 1 day
        }
    }
}

impl Default for ModelGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            referer: "http://localhost:3000".into(),
            title: "Prompt Forge".into(),
            request_timeout_secs: 120,
            catalog_ttl_secs: 3600,
        }
    }
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            schema: SchemaKind::Video,
            temperature: 0.4,
            max_tokens: 1200,
        }
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            enable_metrics: true,
        }
    }
}

//! Error types for Prompt Forge.

use thiserror::Error;

/// Result type alias using Prompt Forge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to callers when the failure is internal.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to enhance prompt.";

/// Core error type for Prompt Forge.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Boundary Errors
    // =========================================================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    // =========================================================================
    // Upstream Errors
    // =========================================================================
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    UpstreamMalformed(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create an upstream unavailable error.
    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// Create an upstream malformed error.
    pub fn upstream_malformed(msg: impl Into<String>) -> Self {
        Self::UpstreamMalformed(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Unauthorized(_) => 401,
            _ => 500,
        }
    }

    /// Whether the error originated at the upstream completion service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_) | Self::UpstreamMalformed(_))
    }

    /// Message that is safe to hand back to the caller.
    ///
    /// Boundary and upstream errors carry their own message; everything else
    /// collapses to a generic one so internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::Unauthorized(msg)
            | Self::UpstreamUnavailable(msg)
            | Self::UpstreamMalformed(msg) => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::invalid_input("Prompt is required.").status_code(), 400);
        assert_eq!(Error::unauthorized("nope").status_code(), 401);
        assert_eq!(Error::upstream_unavailable("down").status_code(), 500);
        assert_eq!(Error::upstream_malformed("empty").status_code(), 500);
        assert_eq!(Error::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = Error::internal("stack: frame 0 at secret.rs");
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);

        let err = Error::config("missing api key sk-123");
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_public_message_keeps_upstream_detail() {
        let err = Error::upstream_unavailable("OpenRouter API error: 502 Bad Gateway: upstream down");
        assert!(err.is_upstream());
        assert_eq!(
            err.public_message(),
            "OpenRouter API error: 502 Bad Gateway: upstream down"
        );
    }
}

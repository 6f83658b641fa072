//! Static-cookie password gate for the UI pages.

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use prompt_forge_core::{config::AuthConfig, Error, Result};

use crate::error::ApiError;
use crate::server::AppState;

/// Message returned for every rejected login.
pub const INCORRECT_PASSWORD: &str = "Incorrect password. Please try again.";

type Digest32 = [u8; 32];

fn digest(value: &str) -> Digest32 {
    Sha256::digest(value.as_bytes()).into()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Password check plus the cookie that marks a browser as let in.
///
/// Without a configured password every login is rejected.
pub struct PasswordGate {
    password_digest: Option<Digest32>,
    cookie_name: String,
    cookie_value: Secret<String>,
    max_age_secs: u64,
}

impl PasswordGate {
    pub fn new(config: &AuthConfig) -> Self {
        let password = config
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .filter(|p| !p.is_empty());

        if password.is_none() {
            tracing::warn!("No landing password configured, the UI gate will reject every login");
        }

        let cookie_value = match (&config.cookie_value, password) {
            (Some(value), _) if !value.expose_secret().is_empty() => value.clone(),
            (_, Some(password)) => Secret::new(to_hex(&digest(&format!(
                "prompt-forge-session:{}",
                password
            )))),
            _ => Secret::new(uuid::Uuid::new_v4().simple().to_string()),
        };

        Self {
            password_digest: password.map(digest),
            cookie_name: config.cookie_name.clone(),
            cookie_value,
            max_age_secs: config.cookie_max_age_secs,
        }
    }

    /// Check a submitted password.
    pub fn verify(&self, candidate: &str) -> Result<()> {
        match self.password_digest {
            Some(expected) if digest(candidate) == expected => Ok(()),
            _ => Err(Error::unauthorized(INCORRECT_PASSWORD)),
        }
    }

    /// Whether the request carries the auth cookie with the expected value.
    pub fn is_authenticated(&self, jar: &CookieJar) -> bool {
        jar.get(&self.cookie_name)
            .map(|cookie| cookie.value() == self.cookie_value.expose_secret().as_str())
            .unwrap_or(false)
    }

    /// Cookie set on successful login.
    pub fn login_cookie(&self) -> Result<Cookie<'static>> {
        self.cookie(self.cookie_value.expose_secret(), self.max_age_secs)
    }

    /// Cookie that clears the login.
    pub fn logout_cookie(&self) -> Result<Cookie<'static>> {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age_secs: u64) -> Result<Cookie<'static>> {
        Cookie::parse(format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
            self.cookie_name, value, max_age_secs
        ))
        .map_err(|e| Error::config(format!("invalid auth cookie: {}", e)))
    }
}

/// `POST /api/login`
pub(crate) async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let password = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("password").and_then(|p| p.as_str()).map(str::to_string))
        .unwrap_or_default();

    if let Err(e) = state.gate.verify(&password) {
        tracing::info!("Rejected login attempt");
        return Err(e.into());
    }

    tracing::info!("Login accepted");
    let cookie = state.gate.login_cookie()?;
    Ok((jar.add(cookie), Json(serde_json::json!({ "ok": true }))))
}

/// `POST /api/logout`
pub(crate) async fn logout_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let cookie = state.gate.logout_cookie()?;
    Ok((jar.add(cookie), Json(serde_json::json!({ "ok": true }))))
}

#![deny(unused)]
//! HTTP gateway for Prompt Forge.
//!
//! This crate provides:
//! - Enhancement and free-model JSON endpoints
//! - Static-cookie password gate for the UI
//! - Embedded landing and app pages
//! - Health and Prometheus metrics endpoints

pub mod auth;
pub mod error;
pub mod pages;
pub mod server;

pub use auth::{PasswordGate, INCORRECT_PASSWORD};
pub use error::{ApiError, ErrorResponse};
pub use server::{AppState, GatewayServer, HealthResponse, ModelsResponse, MODELS_FAILURE};

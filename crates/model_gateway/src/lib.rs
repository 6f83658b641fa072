#![deny(unused)]
//! Upstream model gateway for Prompt Forge.
//!
//! This crate provides:
//! - OpenRouter chat completion client
//! - OpenRouter model catalog with free-model filtering
//! - TTL cache in front of any model catalog

pub mod catalog_cache;
pub mod openrouter;

pub use catalog_cache::CachedCatalog;
pub use openrouter::OpenRouterClient;

#![deny(unused)]
//! Prompt enhancement pipeline for Prompt Forge.
//!
//! This crate provides:
//! - Output format selection from the raw prompt
//! - Schema strategies (video and general) shared by instruction and normalizer
//! - System instruction construction
//! - Normalization of untrusted model output into a valid document
//! - The `EnhancementService` that orchestrates one enhancement call

pub mod format;
pub mod instruction;
pub mod normalizer;
pub mod schema;
pub mod service;

pub use format::select_format;
pub use instruction::{build_system_prompt, build_user_message};
pub use normalizer::{normalize, normalize_output, NormalizedOutput};
pub use schema::{schema_for, EnhancedDocument, EnhancementSchema, GeneralSchema, VideoSchema};
pub use service::{CompletionSettings, EnhancementService};

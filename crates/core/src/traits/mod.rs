//! Core traits for Prompt Forge.
//!
//! - `llm`: upstream completion and model catalog seams

pub mod llm;

pub use llm::*;

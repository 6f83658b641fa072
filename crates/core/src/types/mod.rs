//! Core type definitions for Prompt Forge.
//!
//! All values here are request-scoped; nothing is persisted.

pub mod chat;
pub mod enhancement;
pub mod model;

pub use chat::*;
pub use enhancement::*;
pub use model::*;

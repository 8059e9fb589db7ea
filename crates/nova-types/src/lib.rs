//! Shared domain types for the Nova assistant.
//!
//! Utterances, chat turns, intents, generation fragments, speech chunks,
//! configuration and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod speech;

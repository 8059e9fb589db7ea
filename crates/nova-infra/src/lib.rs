//! Infrastructure layer for Nova.
//!
//! Implements the ports defined in `nova-core`: the Ollama and
//! OpenAI-compatible generation backends, web search, encyclopedia lookups,
//! the host URL launcher and external speech commands. Also loads
//! `config.toml` and resolves the data directory.

pub mod config;
pub mod filesystem;
pub mod knowledge;
pub mod launcher;
pub mod llm;
pub mod search;
pub mod speech;

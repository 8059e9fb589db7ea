//! Generation backend abstractions for Nova.
//!
//! - `LlmProvider`: RPITIT trait for concrete backend adapters
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `ModelAliasTable`: alias → model lookup used by model switching
//! - `StreamInSpan`: keeps a tracing span entered while a stream is polled

pub mod backend;
pub mod box_provider;
pub mod provider;
pub mod span;

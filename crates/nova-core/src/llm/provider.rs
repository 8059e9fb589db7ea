//! LlmProvider trait definition.
//!
//! This is the core abstraction every generation backend implements.
//! `stream` returns `Pin<Box<dyn Stream>>` so the trait stays usable behind
//! the `BoxLlmProvider` wrapper.

use std::pin::Pin;

use futures_util::Stream;

use nova_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Trait for generation backends (local Ollama runtime, remote OpenAI-compatible API).
///
/// Implementations live in nova-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable backend name (e.g., "ollama", "openrouter").
    fn name(&self) -> &str;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// Connection failures surface as the first item of the stream rather
    /// than from this call, so callers have a single error path.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

    /// Model identifiers the backend can serve right now.
    fn installed_models(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, LlmError>> + Send;
}

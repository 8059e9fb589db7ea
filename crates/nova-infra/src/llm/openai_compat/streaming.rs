//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Maps `async-openai`'s [`ChatCompletionResponseStream`] chunks to the
//! backend-agnostic [`StreamEvent`] enum defined in `nova-types`.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use async_openai::types::chat::ChatCompletionResponseStream;

use nova_types::llm::{LlmError, StreamEvent, Usage};

/// Map an async-openai [`ChatCompletionResponseStream`] to a stream of [`StreamEvent`]s.
///
/// Emits `Connected` first, then a `TextDelta` per non-empty content chunk,
/// `Usage` when the final chunk carries it (`stream_options.include_usage`),
/// and `Done` at the end.
pub fn map_openai_stream(
    stream: ChatCompletionResponseStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        yield StreamEvent::Connected;

        let mut stream = stream;
        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| LlmError::Stream(e.to_string()))?;

            if let Some(usage) = &chunk.usage {
                yield StreamEvent::Usage(Usage {
                    input_tokens: usage.prompt_tokens,
                    output_tokens: usage.completion_tokens,
                });
            }

            for choice in &chunk.choices {
                let text = choice.delta.content.clone().unwrap_or_default();
                if !text.is_empty() {
                    yield StreamEvent::TextDelta { text };
                }
            }
        }

        yield StreamEvent::Done;
    })
}

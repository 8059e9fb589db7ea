//! Ollama NDJSON stream to [`StreamEvent`] adapter.
//!
//! `/api/chat` with `stream: true` answers with one JSON object per line:
//!
//! ```text
//! {"message":{"role":"assistant","content":"Hel"},"done":false}
//! {"message":{"role":"assistant","content":"lo"},"done":false}
//! {"done":true,"prompt_eval_count":26,"eval_count":2}
//! ```
//!
//! A line may also carry `{"error":"..."}`, both before and during generation.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use nova_types::llm::{LlmError, StreamEvent, Usage};

use super::types::{OllamaChatChunk, OllamaChatRequest, OllamaErrorBody};

/// Map an Ollama error message onto an [`LlmError`].
pub(crate) fn map_ollama_error(message: &str, model: &str) -> LlmError {
    if message.contains("not found") {
        LlmError::ModelNotProvisioned {
            model: model.to_string(),
        }
    } else {
        LlmError::Provider {
            message: message.to_string(),
        }
    }
}

/// Decode one NDJSON line into zero or more events.
pub(crate) fn events_from_line(line: &[u8], model: &str) -> Result<Vec<StreamEvent>, LlmError> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let chunk: OllamaChatChunk = serde_json::from_slice(line)
        .map_err(|e| LlmError::Deserialization(format!("ollama chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(map_ollama_error(&error, model));
    }

    let mut events = Vec::new();
    if let Some(message) = chunk.message {
        if !message.content.is_empty() {
            events.push(StreamEvent::TextDelta {
                text: message.content,
            });
        }
    }
    if chunk.done {
        if chunk.prompt_eval_count.is_some() || chunk.eval_count.is_some() {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: chunk.prompt_eval_count.unwrap_or_default(),
                output_tokens: chunk.eval_count.unwrap_or_default(),
            }));
        }
        events.push(StreamEvent::Done);
    }
    Ok(events)
}

/// Map a non-success `/api/chat` status and its body onto an [`LlmError`].
pub(crate) fn status_error(status: reqwest::StatusCode, error_body: String, model: &str) -> LlmError {
    let message = serde_json::from_str::<OllamaErrorBody>(&error_body)
        .map(|body| body.error)
        .unwrap_or(error_body);
    tracing::warn!(status = %status, body = %message, "Ollama chat error response");
    match status.as_u16() {
        404 => LlmError::ModelNotProvisioned {
            model: model.to_string(),
        },
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        _ => map_ollama_error(&format!("HTTP {status}: {message}"), model),
    }
}

async fn ensure_success(response: reqwest::Response, model: &str) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_body = response.text().await.unwrap_or_default();
    Err(status_error(status, error_body, model))
}

/// Create a streaming `/api/chat` call returning [`StreamEvent`]s.
pub fn create_ollama_stream(
    client: &reqwest::Client,
    url: &str,
    body: OllamaChatRequest,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    let client = client.clone();
    let url = url.to_string();

    Box::pin(async_stream::try_stream! {
        let model = body.model.clone();
        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let response = ensure_success(response, &model).await?;

        yield StreamEvent::Connected;

        let mut byte_stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;

        while !finished {
            let Some(chunk_result) = byte_stream.next().await else {
                break;
            };
            let chunk = chunk_result.map_err(|e| LlmError::Stream(format!("response body read: {e}")))?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                for event in events_from_line(&line, &model)? {
                    finished |= event == StreamEvent::Done;
                    yield event;
                }
                if finished {
                    break;
                }
            }
        }

        // The final object is not always newline-terminated.
        if !finished {
            for event in events_from_line(&buffer, &model)? {
                yield event;
            }
        }
    })
}

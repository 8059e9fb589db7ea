//! OllamaProvider -- [`LlmProvider`] for a local Ollama runtime.
//!
//! Streams `/api/chat` as NDJSON and lists installed models via `/api/tags`.
//! The model is chosen per request, so one provider serves every alias.

pub mod streaming;
pub mod types;

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;

use nova_core::llm::provider::LlmProvider;
use nova_types::llm::{CompletionRequest, LlmError, StreamEvent};

use self::streaming::create_ollama_stream;
use self::types::{OllamaChatRequest, OllamaMessage, OllamaOptions, OllamaTagsResponse};

/// Local model runtime reached over HTTP.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a provider for the runtime at `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Translate a [`CompletionRequest`] into an `/api/chat` body.
    ///
    /// The system instruction becomes the first message.
    fn build_request(request: &CompletionRequest) -> OllamaChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|msg| OllamaMessage {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }));

        OllamaChatRequest {
            model: request.model.clone(),
            messages,
            stream: true,
            options: OllamaOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let body = Self::build_request(&request);
        create_ollama_stream(&self.client, &self.url("/api/chat"), body)
    }

    async fn installed_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("ollama tags: {e}")))?;
        Ok(tags.models.into_iter().map(|tag| tag.name).collect())
    }
}

//! Wire types for the Ollama chat and tags endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    pub options: OllamaOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OllamaOptions {
    /// Maximum number of tokens to generate.
    pub num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// One NDJSON line of a streamed `/api/chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatChunk {
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    /// Set instead of `message` when the runtime reports a failure.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModelTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelTag {
    pub name: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorBody {
    pub error: String,
}

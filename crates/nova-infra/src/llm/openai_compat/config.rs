//! Configuration and defaults for OpenAI-compatible backends.

use secrecy::SecretString;

/// OpenRouter's OpenAI-compatible API root.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for an OpenAI-compatible backend.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openrouter").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

/// OpenRouter default configuration.
pub fn openrouter_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openrouter".into(),
        base_url: OPENROUTER_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Name a backend after its host, falling back to "openai_compatible".
pub fn provider_name_for(base_url: &str) -> String {
    if base_url.contains("openrouter.ai") {
        "openrouter".to_string()
    } else if base_url.contains("api.openai.com") {
        "openai".to_string()
    } else {
        "openai_compatible".to_string()
    }
}

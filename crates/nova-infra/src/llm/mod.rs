//! Generation backend implementations.
//!
//! Concrete [`LlmProvider`](nova_core::llm::provider::LlmProvider)s for the
//! local Ollama runtime and OpenAI-compatible remote APIs, plus factories
//! that build them from configuration.

pub mod ollama;
pub mod openai_compat;

use secrecy::SecretString;

use nova_core::llm::box_provider::BoxLlmProvider;
use nova_types::config::{LocalBackendConfig, RemoteBackendConfig};

use self::ollama::OllamaProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OpenAiCompatConfig, provider_name_for};

/// Build the local backend, or `None` when it is disabled.
pub fn create_local_provider(config: &LocalBackendConfig) -> Option<BoxLlmProvider> {
    if !config.enabled {
        tracing::info!("local backend disabled in config");
        return None;
    }
    Some(BoxLlmProvider::new(OllamaProvider::new(&config.base_url)))
}

/// Build the remote backend, or `None` when it is disabled or has no key.
///
/// The API key is read from the environment variable named by
/// `config.api_key_env` and never leaves a [`SecretString`].
pub fn create_remote_provider(config: &RemoteBackendConfig) -> Option<BoxLlmProvider> {
    if !config.enabled {
        tracing::info!("remote backend disabled in config");
        return None;
    }

    let api_key = match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => SecretString::from(key),
        _ => {
            tracing::warn!(
                env = %config.api_key_env,
                "remote backend API key not set; remote generation unavailable"
            );
            return None;
        }
    };

    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: provider_name_for(&config.base_url),
        base_url: config.base_url.clone(),
        api_key,
        model: config.model.clone(),
    });
    Some(BoxLlmProvider::new(provider))
}

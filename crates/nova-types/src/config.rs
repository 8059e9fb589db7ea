//! Global configuration types for Nova.
//!
//! `GlobalConfig` represents the top-level `config.toml`. Every section and
//! field has a default, so an empty file (or no file) yields a working
//! local-first assistant.

use serde::{Deserialize, Serialize};

use crate::intent::{ModelAlias, SiteEntry};

/// Top-level configuration for the assistant.
///
/// Loaded from `~/.nova/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub local: LocalBackendConfig,

    #[serde(default)]
    pub remote: RemoteBackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub voice: VoiceConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Sites the router can open, in match priority order.
    #[serde(default = "default_sites")]
    pub sites: Vec<SiteEntry>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig::default(),
            local: LocalBackendConfig::default(),
            remote: RemoteBackendConfig::default(),
            search: SearchConfig::default(),
            knowledge: KnowledgeConfig::default(),
            voice: VoiceConfig::default(),
            server: ServerConfig::default(),
            sites: default_sites(),
        }
    }
}

/// Persona and generation settings shared by both backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Name the assistant introduces itself with.
    pub name: String,
    /// Extra persona lines appended to the system instruction.
    pub persona: Option<String>,
    /// Whole-request deadline in seconds. `0` disables the timeout.
    pub request_timeout_secs: u64,
    pub temperature: Option<f64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Nova".to_string(),
            persona: None,
            request_timeout_secs: 120,
            temperature: None,
        }
    }
}

/// Local model runtime (Ollama).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalBackendConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Model selected when the session starts.
    pub default_model: String,
    pub max_tokens: u32,
    /// Alias table, in listing and matching order.
    pub aliases: Vec<ModelAlias>,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            default_model: "llama3.1".to_string(),
            max_tokens: 4096,
            aliases: default_aliases(),
        }
    }
}

/// Remote OpenAI-compatible backend (OpenRouter by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteBackendConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_tokens: u32,
}

impl Default for RemoteBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "moonshotai/kimi-k2".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            max_tokens: 4096,
        }
    }
}

/// Web-search augmentation of chat prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.duckduckgo.com/".to_string(),
            max_results: 3,
        }
    }
}

/// Encyclopedia lookups for "who is" / "what is" questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Number of sentences kept from the article summary.
    pub sentences: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://en.wikipedia.org/api/rest_v1/page/summary/".to_string(),
            sentences: 2,
        }
    }
}

/// External speech commands for the terminal front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Text-to-speech command; the chunk text is appended as the last argument.
    /// An empty list disables audio.
    pub speak_command: Vec<String>,
    /// Speech-to-text command printing one utterance on stdout per run.
    pub transcribe_command: Option<Vec<String>>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        let speak_command = if cfg!(target_os = "macos") {
            vec!["say".to_string()]
        } else {
            vec!["espeak".to_string(), "-s".to_string(), "175".to_string()]
        };
        Self {
            speak_command,
            transcribe_command: None,
        }
    }
}

/// Web front end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of static pages served for unknown paths.
    pub web_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            web_dir: None,
        }
    }
}

fn default_aliases() -> Vec<ModelAlias> {
    vec![
        ModelAlias::new("llama", "llama3.1"),
        ModelAlias::new("mistral", "mistral"),
        ModelAlias::new("phi", "phi3:mini"),
        ModelAlias::new("deepseek", "deepseek-coder"),
        ModelAlias::new("coder", "deepseek-coder"),
        ModelAlias::new("qwen", "qwen3:8b"),
        ModelAlias::new("vision", "llava"),
    ]
}

fn default_sites() -> Vec<SiteEntry> {
    vec![
        SiteEntry::new(
            "google",
            "Google",
            "https://www.google.com/",
            Some("https://www.google.com/search?q={}"),
        ),
        SiteEntry::new(
            "youtube",
            "YouTube",
            "https://youtube.com/",
            Some("https://www.youtube.com/results?search_query={}"),
        ),
        SiteEntry::new(
            "facebook",
            "Facebook",
            "https://facebook.com/",
            Some("https://www.facebook.com/search/top?q={}"),
        ),
        SiteEntry::new(
            "instagram",
            "Instagram",
            "https://instagram.com/",
            Some("https://www.google.com/search?q=site:instagram.com+{}"),
        ),
        SiteEntry::new(
            "amazon",
            "Amazon",
            "https://www.amazon.in/",
            Some("https://www.amazon.in/s?k={}"),
        ),
        SiteEntry::new(
            "flipkart",
            "Flipkart",
            "https://www.flipkart.com/",
            Some("https://www.flipkart.com/search?q={}"),
        ),
        SiteEntry::new(
            "wikipedia",
            "Wikipedia",
            "https://en.wikipedia.org/",
            Some("https://en.wikipedia.org/wiki/{}"),
        ),
        SiteEntry::new(
            "gmail",
            "Gmail",
            "https://mail.google.com/",
            Some("https://mail.google.com/mail/u/0/#search/{}"),
        ),
        SiteEntry::new("chatgpt", "ChatGPT", "https://chat.openai.com/", None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.local.default_model, "llama3.1");
        assert_eq!(config.local.aliases.len(), 7);
        assert_eq!(config.remote.model, "moonshotai/kimi-k2");
        assert_eq!(config.assistant.request_timeout_secs, 120);
        assert!(!config.search.enabled);
        assert_eq!(config.sites.first().map(|s| s.key.as_str()), Some("google"));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.sites.len(), 9);
        assert_eq!(config.knowledge.sentences, 2);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: GlobalConfig = toml::from_str(
            r#"
[local]
default_model = "mistral"

[[local.aliases]]
alias = "coder"
model = "qwen2.5-coder"
"#,
        )
        .unwrap();
        assert_eq!(config.local.default_model, "mistral");
        assert_eq!(config.local.base_url, "http://localhost:11434");
        assert_eq!(config.local.aliases, vec![ModelAlias::new("coder", "qwen2.5-coder")]);
    }

    #[test]
    fn test_alias_order_is_preserved() {
        let aliases: Vec<String> = default_aliases().into_iter().map(|a| a.alias).collect();
        assert_eq!(
            aliases,
            ["llama", "mistral", "phi", "deepseek", "coder", "qwen", "vision"]
        );
    }
}

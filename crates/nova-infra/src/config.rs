//! Global configuration loader for Nova.
//!
//! Reads `config.toml` from the data directory (`~/.nova/` by default) and
//! deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;
use std::time::Duration;

use nova_types::config::{AssistantConfig, GlobalConfig};

use crate::filesystem::config_path;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GlobalConfig::default()
        }
    }
}

/// Per-request deadline; `0` seconds disables it.
pub fn request_timeout(assistant: &AssistantConfig) -> Option<Duration> {
    (assistant.request_timeout_secs > 0).then(|| Duration::from_secs(assistant.request_timeout_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.local.default_model, "llama3.1");
        assert_eq!(config.server.port, 5000);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[assistant]
name = "Aria"
request_timeout_secs = 30

[remote]
model = "openai/gpt-4o-mini"

[[sites]]
key = "github"
name = "GitHub"
home_url = "https://github.com/"
search_url = "https://github.com/search?q={}"
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.assistant.name, "Aria");
        assert_eq!(config.remote.model, "openai/gpt-4o-mini");
        assert_eq!(config.remote.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].key, "github");
        assert_eq!(request_timeout(&config.assistant), Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.assistant.name, "Nova");
        assert_eq!(config.sites.len(), 9);
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let assistant = AssistantConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(request_timeout(&assistant), None);
    }
}

//! Application state wiring the dispatcher to its adapters.
//!
//! AppState holds the single conversation of this process and the loaded
//! configuration. Used by both the terminal loop and the HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use nova_core::brain::instruction::system_instruction;
use nova_core::brain::{BackendSlot, GenerationSettings, StreamingBrain};
use nova_core::chat::session::Session;
use nova_core::dispatch::Dispatcher;
use nova_core::intent::router::IntentRouter;
use nova_core::intent::sites::SiteRegistry;
use nova_core::llm::backend::ModelAliasTable;
use nova_infra::config::{load_global_config, request_timeout};
use nova_infra::filesystem::resolve_data_dir;
use nova_infra::knowledge::WikipediaKnowledge;
use nova_infra::launcher::SystemLauncher;
use nova_infra::llm::{create_local_provider, create_remote_provider};
use nova_infra::search::DuckDuckGoSearch;
use nova_types::config::GlobalConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load `config.toml` and wire the dispatcher.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        Ok(Self::from_config(config, data_dir))
    }

    /// Wire every adapter the configuration enables.
    pub fn from_config(config: GlobalConfig, data_dir: PathBuf) -> Self {
        let aliases = Arc::new(ModelAliasTable::new(config.local.aliases.clone()));
        let router = IntentRouter::new(SiteRegistry::new(config.sites.clone()), aliases.clone());

        let settings = GenerationSettings {
            temperature: config.assistant.temperature,
            timeout: request_timeout(&config.assistant),
        };
        let instruction =
            system_instruction(&config.assistant.name, config.assistant.persona.as_deref());
        let mut brain = StreamingBrain::new(instruction, settings);

        if let Some(provider) = create_local_provider(&config.local) {
            brain = brain.with_local(BackendSlot {
                provider: Arc::new(provider),
                max_tokens: config.local.max_tokens,
            });
        }
        if let Some(provider) = create_remote_provider(&config.remote) {
            brain = brain.with_remote(
                BackendSlot {
                    provider: Arc::new(provider),
                    max_tokens: config.remote.max_tokens,
                },
                config.remote.model.clone(),
            );
        }
        if config.search.enabled {
            brain = brain.with_search(Arc::new(DuckDuckGoSearch::new(&config.search)));
        }

        let session = Session::new(config.local.default_model.clone());
        info!(
            session_id = %session.id(),
            model = %config.local.default_model,
            "session started"
        );

        let mut dispatcher = Dispatcher::new(
            router,
            brain,
            session.shared(),
            aliases,
            Arc::new(SystemLauncher),
        );
        if config.knowledge.enabled {
            dispatcher = dispatcher.with_knowledge(Arc::new(WikipediaKnowledge::new(&config.knowledge)));
        }

        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
            data_dir,
        }
    }
}

/// A state with no backends or network collaborators, for handler tests.
#[cfg(test)]
pub fn offline_state() -> AppState {
    let mut config = GlobalConfig::default();
    config.local.enabled = false;
    config.remote.enabled = false;
    config.search.enabled = false;
    config.knowledge.enabled = false;
    AppState::from_config(config, PathBuf::from("."))
}

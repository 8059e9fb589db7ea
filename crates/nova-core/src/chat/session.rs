//! Conversation session: history, active local model, specification mode.
//!
//! One session per process. It lives behind a `tokio::sync::Mutex` so that a
//! generation can hold the owned guard for its whole lifetime.

use std::sync::Arc;

use uuid::Uuid;

use nova_types::error::ModelSwitchError;
use nova_types::llm::Backend;

use super::history::ConversationHistory;
use crate::intent::specification::SpecificationMode;
use crate::llm::backend::ModelAliasTable;

/// Session handle shared between the dispatcher and in-flight generations.
pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

/// Mutable per-conversation state.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    pub history: ConversationHistory,
    active_model: String,
    last_response: Option<String>,
    pub specification: SpecificationMode,
}

impl Session {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            history: ConversationHistory::new(),
            active_model: default_model.into(),
            last_response: None,
            specification: SpecificationMode::default(),
        }
    }

    /// Wrap the session for sharing across tasks.
    pub fn shared(self) -> SharedSession {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// Time-sortable id used to correlate log lines of one conversation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Model the local backend currently targets.
    pub fn active_model(&self) -> &str {
        &self.active_model
    }

    /// Most recent text handed to a front end, reply or generation alike.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Remember `text` for read-back. Blank text leaves the slot alone.
    pub fn record_response(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.last_response = Some(text.to_string());
        }
    }

    /// Choose the backend for the next generation.
    pub fn select_backend(&self, use_remote: bool) -> Backend {
        if use_remote {
            Backend::Remote
        } else {
            Backend::Local(self.active_model.clone())
        }
    }

    /// Point the local backend at the model registered under `alias`.
    ///
    /// Returns the confirmation text on a hit. History is never touched.
    pub fn switch_model(
        &mut self,
        alias: &str,
        aliases: &ModelAliasTable,
    ) -> Result<String, ModelSwitchError> {
        let model = aliases.lookup(alias)?;
        self.active_model = model.to_string();
        tracing::info!(alias, model, "switched local model");
        Ok(format!("Switched to {model}"))
    }
}

//! Streaming brain: turns a prompt into a lazy stream of fragments.
//!
//! The brain picks the backend, assembles the request from the fixed system
//! instruction, the session history and the new prompt, forwards deltas as
//! they arrive, and commits the assistant turn exactly once whatever happens.

pub mod commit;
pub mod instruction;
pub mod stream;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::OwnedMutexGuard;
use tokio::time::Instant;
use tracing::{info, info_span, warn};

use nova_types::llm::{
    Backend, CompletionRequest, FailureKind, Fragment, GenerationOutcome, LlmError, Message,
    MessageRole, StreamEvent,
};

use crate::chat::session::Session;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::span::StreamInSpan;
use crate::service::search::{WebSearch, augment_prompt};

use self::commit::TurnCommit;
use self::stream::GenerationStream;

/// Fragment yielded when the selected backend is not configured.
pub const BACKEND_UNAVAILABLE_WARNING: &str = "⚠️ Generation backend unavailable.";

/// A configured backend and the limits it is called with.
#[derive(Clone)]
pub struct BackendSlot {
    pub provider: Arc<BoxLlmProvider>,
    pub max_tokens: u32,
}

/// Settings shared by both backends.
#[derive(Debug, Clone, Default)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    /// Whole-request deadline measured from the start of the generation.
    pub timeout: Option<Duration>,
}

/// Produces one generation at a time against the local or remote backend.
pub struct StreamingBrain {
    local: Option<BackendSlot>,
    remote: Option<(BackendSlot, String)>,
    instruction: String,
    settings: GenerationSettings,
    search: Option<Arc<dyn WebSearch>>,
}

impl StreamingBrain {
    pub fn new(instruction: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            local: None,
            remote: None,
            instruction: instruction.into(),
            settings,
            search: None,
        }
    }

    pub fn with_local(mut self, slot: BackendSlot) -> Self {
        self.local = Some(slot);
        self
    }

    /// Configure the remote backend and the single model it always uses.
    pub fn with_remote(mut self, slot: BackendSlot, model: impl Into<String>) -> Self {
        self.remote = Some((slot, model.into()));
        self
    }

    pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn local_provider(&self) -> Option<&Arc<BoxLlmProvider>> {
        self.local.as_ref().map(|slot| &slot.provider)
    }

    pub fn remote_model(&self) -> Option<&str> {
        self.remote.as_ref().map(|(_, model)| model.as_str())
    }

    fn resolve(&self, backend: &Backend) -> Option<(BackendSlot, String)> {
        match backend {
            Backend::Local(model) => self.local.clone().map(|slot| (slot, model.clone())),
            Backend::Remote => self.remote.clone(),
        }
    }

    /// Start a generation for `prompt` against `backend`.
    ///
    /// `session` stays locked until the returned stream ends or is dropped.
    /// The backend sees the prompt (possibly augmented with search context);
    /// the history records it unmodified.
    pub fn generate(
        &self,
        session: OwnedMutexGuard<Session>,
        prompt: String,
        backend: Backend,
    ) -> GenerationStream {
        let outcome = Arc::new(OnceLock::new());
        let outcome_slot = outcome.clone();

        let target = self.resolve(&backend);
        let model = target
            .as_ref()
            .map(|(_, model)| model.clone())
            .unwrap_or_default();
        let provider_name = target
            .as_ref()
            .map(|(slot, _)| slot.provider.name().to_string())
            .unwrap_or_default();
        let span = info_span!(
            "generation",
            session_id = %session.id(),
            backend = backend.label(),
            provider = %provider_name,
            model = %model,
            max_tokens = target.as_ref().map(|(slot, _)| slot.max_tokens).unwrap_or_default(),
        );

        let instruction = self.instruction.clone();
        let settings = self.settings.clone();
        let search = self.search.clone();
        let label = backend.label();

        let fragments = async_stream::stream! {
            let started = Instant::now();
            let mut messages = session.history.to_messages();
            let mut commit = TurnCommit::begin(session, &prompt);

            let Some((backend_slot, model)) = target else {
                warn!(backend = label, "generation backend not configured");
                commit.finish();
                let _ = outcome_slot.set(GenerationOutcome::Failed(FailureKind::Unavailable));
                yield Fragment::error(FailureKind::Unavailable, BACKEND_UNAVAILABLE_WARNING);
                return;
            };

            let user_content = match &search {
                Some(search) => match search.context(&prompt).await {
                    Some(context) => augment_prompt(&context, &prompt),
                    None => prompt.clone(),
                },
                None => prompt.clone(),
            };
            messages.push(Message {
                role: MessageRole::User,
                content: user_content,
            });

            let request = CompletionRequest {
                model: model.clone(),
                messages,
                system: Some(instruction),
                max_tokens: backend_slot.max_tokens,
                temperature: settings.temperature,
                stream: true,
            };
            info!(messages = request.messages.len(), "starting generation");

            let deadline = settings.timeout.map(|t| started + t);
            let mut events = backend_slot.provider.stream(request);

            let failure = loop {
                let next = match deadline {
                    Some(deadline) => match tokio::time::timeout_at(deadline, events.next()).await {
                        Ok(next) => next,
                        Err(_) => Some(Err(LlmError::Timeout {
                            after_ms: settings.timeout.map(|t| t.as_millis() as u64).unwrap_or_default(),
                        })),
                    },
                    None => events.next().await,
                };

                match next {
                    Some(Ok(StreamEvent::TextDelta { text })) => {
                        if text.is_empty() {
                            continue;
                        }
                        commit.push(&text);
                        yield Fragment::content(text);
                    }
                    Some(Ok(StreamEvent::Done)) | None => break None,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => break Some(err),
                }
            };

            commit.finish();
            match failure {
                None => {
                    let _ = outcome_slot.set(GenerationOutcome::Completed);
                }
                Some(err) => {
                    warn!(error = %err, "generation failed");
                    let kind = err.failure_kind();
                    let _ = outcome_slot.set(GenerationOutcome::Failed(kind));
                    yield Fragment::error(kind, failure_text(&err, label, &model));
                }
            }
        };

        GenerationStream::new(Box::pin(StreamInSpan::new(fragments, span)), outcome)
    }
}

/// User-facing text for a failed generation.
fn failure_text(err: &LlmError, label: &str, model: &str) -> String {
    match err.failure_kind() {
        FailureKind::Unavailable => BACKEND_UNAVAILABLE_WARNING.to_string(),
        FailureKind::NotProvisioned => {
            format!("⚠️ Model '{model}' is not installed yet. Run `ollama pull {model}`.")
        }
        FailureKind::Transient => format!("Error connecting to {label} backend ({model}): {err}"),
    }
}

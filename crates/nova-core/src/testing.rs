//! In-memory doubles shared by the unit tests of this crate.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::{Stream, StreamExt, stream};

use nova_types::error::{KnowledgeError, LaunchError};
use nova_types::llm::{CompletionRequest, LlmError, StreamEvent};

use crate::llm::provider::LlmProvider;
use crate::service::knowledge::KnowledgeSource;
use crate::service::launcher::Launcher;

type Script = Box<dyn Fn() -> Vec<Result<StreamEvent, LlmError>> + Send + Sync>;

/// Provider that replays a fixed script and records every request.
pub struct ScriptedProvider {
    script: Script,
    hang: bool,
    pub calls: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    fn with_script(script: Script, hang: bool) -> Self {
        Self {
            script,
            hang,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn deltas(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    /// Streams `parts` then ends normally.
    pub fn replying(parts: &[&str]) -> Self {
        let parts = Self::deltas(parts);
        Self::with_script(
            Box::new(move || {
                let mut events: Vec<_> = parts
                    .iter()
                    .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() }))
                    .collect();
                events.push(Ok(StreamEvent::Done));
                events
            }),
            false,
        )
    }

    /// Streams `parts` then fails with `error()`.
    pub fn failing_after(parts: &[&str], error: fn() -> LlmError) -> Self {
        let parts = Self::deltas(parts);
        Self::with_script(
            Box::new(move || {
                let mut events: Vec<_> = parts
                    .iter()
                    .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() }))
                    .collect();
                events.push(Err(error()));
                events
            }),
            false,
        )
    }

    /// Streams `parts` then never yields again.
    pub fn hanging_after(parts: &[&str]) -> Self {
        let parts = Self::deltas(parts);
        Self::with_script(
            Box::new(move || {
                parts
                    .iter()
                    .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() }))
                    .collect()
            }),
            true,
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock poisoned").push(request);
        let events = stream::iter((self.script)());
        if self.hang {
            Box::pin(events.chain(stream::pending()))
        } else {
            Box::pin(events)
        }
    }

    async fn installed_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec!["llama3.1".to_string()])
    }
}

/// Launcher that records URLs instead of opening them.
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Mutex<Vec<String>>,
    pub fail: bool,
}

impl Launcher for RecordingLauncher {
    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        if self.fail {
            return Err(LaunchError::Failed {
                url: url.to_string(),
                reason: "no browser".to_string(),
            });
        }
        self.opened
            .lock()
            .expect("opened lock poisoned")
            .push(url.to_string());
        Ok(())
    }
}

/// Knowledge source with a single known topic.
pub struct FixedKnowledge {
    pub topic: &'static str,
    pub summary: &'static str,
}

impl KnowledgeSource for FixedKnowledge {
    fn summary<'a>(
        &'a self,
        topic: &'a str,
    ) -> futures_util::future::BoxFuture<'a, Result<String, KnowledgeError>> {
        Box::pin(async move {
            if topic == self.topic {
                Ok(self.summary.to_string())
            } else {
                Err(KnowledgeError::NotFound(topic.to_string()))
            }
        })
    }
}

/// Knowledge source that answers only after `gate` is notified.
pub struct GatedKnowledge {
    pub gate: Arc<tokio::sync::Notify>,
    pub summary: &'static str,
}

impl KnowledgeSource for GatedKnowledge {
    fn summary<'a>(
        &'a self,
        _topic: &'a str,
    ) -> futures_util::future::BoxFuture<'a, Result<String, KnowledgeError>> {
        Box::pin(async move {
            self.gate.notified().await;
            Ok(self.summary.to_string())
        })
    }
}
